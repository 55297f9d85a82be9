//! Index-driven duel: one round per call, player picks from a numbered list.
//!
//! This is the direct-selection front-end over the same round stepping the
//! runtime orchestrator uses. It owns its combatants and actions and never
//! pauses, which makes it convenient for menus and scripted play.

use crate::action::{Action, ActionProfile};
use crate::config::GameConfig;
use crate::env::RollSource;
use crate::error::{ErrorSeverity, GameError};
use crate::state::Combatant;

use super::battle::{Battle, RoundReport};

/// Rejections from [`Duel::try_execute`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DuelError {
    #[error("battle already over, {winner} won")]
    BattleOver { winner: String },

    #[error("action index {index} out of range ({len} actions)")]
    InvalidActionIndex { index: usize, len: usize },
}

impl GameError for DuelError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BattleOver { .. } => ErrorSeverity::Recoverable,
            Self::InvalidActionIndex { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver { .. } => "DUEL_BATTLE_OVER",
            Self::InvalidActionIndex { .. } => "DUEL_INVALID_ACTION_INDEX",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Duel {
    player: Combatant,
    enemy: Combatant,
    player_actions: Vec<Action>,
    enemy_action: Action,
    failure_stack_bonus: f32,
    round: u32,
}

impl Duel {
    /// Builds a duel, normalizing everything it is handed.
    ///
    /// Combatants are normalized to start alive; an empty action list is
    /// replaced by a single default action.
    pub fn new(
        mut player: Combatant,
        mut enemy: Combatant,
        player_actions: &[ActionProfile],
        enemy_action: &ActionProfile,
        config: &GameConfig,
    ) -> Self {
        player.normalize();
        enemy.normalize();

        let mut actions: Vec<Action> = player_actions.iter().map(Action::from).collect();
        if actions.is_empty() {
            actions.push(Action::default());
        }

        Self {
            player,
            enemy,
            player_actions: actions,
            enemy_action: enemy_action.normalize(),
            failure_stack_bonus: config.failure_stack_bonus,
            round: 1,
        }
    }

    pub fn action_count(&self) -> usize {
        self.player_actions.len()
    }

    pub fn is_valid_action_index(&self, index: usize) -> bool {
        index < self.player_actions.len()
    }

    pub fn action(&self, index: usize) -> Option<&Action> {
        self.player_actions.get(index)
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn enemy(&self) -> &Combatant {
        &self.enemy
    }

    /// Number of the round the next call will play.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Name of the surviving side once the duel is decided.
    pub fn winner(&self) -> Option<&str> {
        if !self.player.is_alive() || !self.enemy.is_alive() {
            Some(if self.player.is_alive() {
                self.player.display_name()
            } else {
                self.enemy.display_name()
            })
        } else {
            None
        }
    }

    /// Play one round with the player action at `index`.
    pub fn try_execute(
        &mut self,
        index: usize,
        rng: &mut (impl RollSource + ?Sized),
    ) -> Result<RoundReport, DuelError> {
        if let Some(winner) = self.winner() {
            return Err(DuelError::BattleOver {
                winner: winner.to_owned(),
            });
        }

        let action = *self
            .player_actions
            .get(index)
            .ok_or(DuelError::InvalidActionIndex {
                index,
                len: self.player_actions.len(),
            })?;

        let mut battle = Battle::new(
            &mut self.player,
            &mut self.enemy,
            &self.enemy_action,
            self.failure_stack_bonus,
        )
        .starting_at_round(self.round);
        let report = battle.play_round(rng, &action);
        self.round = battle.round();

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Effect;
    use crate::combat::BattleStatus;
    use crate::env::ScriptedRolls;

    fn duel(actions: &[ActionProfile]) -> Duel {
        Duel::new(
            Combatant::new("Player"),
            Combatant::new("Enemy"),
            actions,
            &ActionProfile::new(1.0).on_success(Effect::on_target(-1)),
            &GameConfig::default(),
        )
    }

    #[test]
    fn empty_action_list_gets_a_default() {
        let duel = duel(&[]);
        assert_eq!(duel.action_count(), 1);
        assert_eq!(duel.action(0), Some(&Action::default()));
    }

    #[test]
    fn invalid_index_is_rejected_without_side_effects() {
        let mut duel = duel(&[ActionProfile::default()]);
        let mut rng = ScriptedRolls::constant(0.0);

        let err = duel.try_execute(3, &mut rng).unwrap_err();
        assert_eq!(err, DuelError::InvalidActionIndex { index: 3, len: 1 });
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(duel.player().current_hp(), 10);
        assert_eq!(duel.round(), 1);
        assert_eq!(rng.drawn(), 0);
    }

    #[test]
    fn rounds_advance_per_call_until_decided() {
        let strike = ActionProfile::new(1.0).on_success(Effect::on_target(-4));
        let mut duel = duel(&[strike]);
        let mut rng = ScriptedRolls::constant(0.5);

        let first = duel.try_execute(0, &mut rng).unwrap();
        assert_eq!(first.round, 1);
        assert_eq!(duel.round(), 2);
        assert_eq!(duel.player().current_hp(), 9);

        duel.try_execute(0, &mut rng).unwrap();
        let last = duel.try_execute(0, &mut rng).unwrap();
        assert_eq!(last.round, 3);
        assert_eq!(last.status, BattleStatus::PlayerWon);
        assert_eq!(duel.winner(), Some("Player"));

        let err = duel.try_execute(0, &mut rng).unwrap_err();
        assert_eq!(
            err,
            DuelError::BattleOver {
                winner: "Player".into()
            }
        );
    }

    #[test]
    fn loaded_combatants_are_normalized() {
        let duel = Duel::new(
            Combatant::new("Player").with_hp(10, 0),
            Combatant::new("Enemy"),
            &[],
            &ActionProfile::default(),
            &GameConfig::default(),
        );
        assert_eq!(duel.player().current_hp(), 1);
        assert_eq!(duel.winner(), None);
    }
}
