//! Round stepping for a player-vs-enemy battle.

use crate::action::Action;
use crate::env::RollSource;
use crate::state::Combatant;

use super::resolution::{TurnResolution, resolve_turn};

/// Where a battle stands after a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleStatus {
    Ongoing,
    PlayerWon,
    EnemyWon,
}

impl BattleStatus {
    fn of(player: &Combatant, enemy: &Combatant) -> Self {
        if !player.is_alive() {
            BattleStatus::EnemyWon
        } else if !enemy.is_alive() {
            BattleStatus::PlayerWon
        } else {
            BattleStatus::Ongoing
        }
    }

    pub fn is_over(self) -> bool {
        !matches!(self, BattleStatus::Ongoing)
    }
}

/// Everything that happened in one round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundReport {
    /// 1-indexed round number.
    pub round: u32,
    /// `None` when the battle was already over at round start.
    pub player_turn: Option<TurnResolution>,
    /// `None` when the enemy fell to the player's turn (or the battle was over).
    pub enemy_turn: Option<TurnResolution>,
    pub status: BattleStatus,
}

/// Immutable record of a finished battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    player_won: bool,
    player: Combatant,
    enemy: Combatant,
    rounds: u32,
}

impl BattleResult {
    pub fn new(player_won: bool, player: Combatant, enemy: Combatant, rounds: u32) -> Self {
        Self {
            player_won,
            player,
            enemy,
            rounds,
        }
    }

    pub fn player_won(&self) -> bool {
        self.player_won
    }

    /// Player as it stood when the battle ended.
    pub fn player(&self) -> &Combatant {
        &self.player
    }

    /// Enemy as it stood when the battle ended.
    pub fn enemy(&self) -> &Combatant {
        &self.enemy
    }

    /// Rounds in which the player acted.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn winner_name(&self) -> &str {
        if self.player_won {
            self.player.display_name()
        } else {
            self.enemy.display_name()
        }
    }
}

/// A battle in progress over borrowed combatants.
///
/// The player acts first each round with the action chosen for the whole
/// battle; the enemy answers with its fixed action only if it survived. The
/// round counter advances after a full round.
///
/// Termination is not guaranteed: if neither action can ever lower HP the
/// battle runs forever. Supplying such actions is a configuration error.
pub struct Battle<'a> {
    player: &'a mut Combatant,
    enemy: &'a mut Combatant,
    enemy_action: &'a Action,
    failure_stack_bonus: f32,
    round: u32,
    rounds_played: u32,
}

impl<'a> Battle<'a> {
    pub fn new(
        player: &'a mut Combatant,
        enemy: &'a mut Combatant,
        enemy_action: &'a Action,
        failure_stack_bonus: f32,
    ) -> Self {
        Self {
            player,
            enemy,
            enemy_action,
            failure_stack_bonus,
            round: 1,
            rounds_played: 0,
        }
    }

    /// Continue numbering from `round` (used by front-ends that keep their own counter).
    #[must_use]
    pub fn starting_at_round(mut self, round: u32) -> Self {
        self.round = round.max(1);
        self
    }

    /// Number of the round that will be played next.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn status(&self) -> BattleStatus {
        BattleStatus::of(self.player, self.enemy)
    }

    pub fn is_over(&self) -> bool {
        self.status().is_over()
    }

    pub fn player(&self) -> &Combatant {
        self.player
    }

    pub fn enemy(&self) -> &Combatant {
        self.enemy
    }

    /// Play one round with `player_action`.
    ///
    /// If either side is already down, nothing resolves and the report carries
    /// no turns.
    pub fn play_round(
        &mut self,
        rng: &mut (impl RollSource + ?Sized),
        player_action: &Action,
    ) -> RoundReport {
        let round = self.round;

        if self.is_over() {
            return RoundReport {
                round,
                player_turn: None,
                enemy_turn: None,
                status: self.status(),
            };
        }

        self.rounds_played += 1;
        let player_turn = resolve_turn(
            rng,
            self.failure_stack_bonus,
            Some(player_action),
            self.player,
            self.enemy,
        );

        if !self.enemy.is_alive() {
            return RoundReport {
                round,
                player_turn: Some(player_turn),
                enemy_turn: None,
                status: self.status(),
            };
        }

        let enemy_turn = resolve_turn(
            rng,
            self.failure_stack_bonus,
            Some(self.enemy_action),
            self.enemy,
            self.player,
        );
        self.round += 1;

        RoundReport {
            round,
            player_turn: Some(player_turn),
            enemy_turn: Some(enemy_turn),
            status: self.status(),
        }
    }

    /// Play rounds until one side is down, without pausing.
    pub fn run_to_end(
        mut self,
        rng: &mut (impl RollSource + ?Sized),
        player_action: &Action,
    ) -> BattleResult {
        while !self.is_over() {
            self.play_round(rng, player_action);
        }
        self.finish()
    }

    /// Snapshot the combatants into a [`BattleResult`].
    pub fn finish(self) -> BattleResult {
        BattleResult::new(
            self.player.is_alive(),
            self.player.clone(),
            self.enemy.clone(),
            self.rounds_played,
        )
    }
}
