//! Paced battle loop over a shared arena.
//!
//! [`BattleOrchestrator`] owns the two combatants, the enemy's fixed action,
//! and the roll source. A battle plays one round at a time through
//! [`game_core::Battle`], publishing every resolution and pausing between
//! rounds. The arena lock is only held while a round resolves, never across
//! a pause.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use game_core::{Action, Battle, BattleResult, Combatant, RollSource, RoundReport};

use crate::api::{Result, RuntimeError};
use crate::events::{BattleEvent, EventBus};
use crate::pacing::{Pacer, Pause};

/// Everything a battle mutates.
pub struct Arena {
    pub player: Combatant,
    pub enemy: Combatant,
    pub enemy_action: Action,
    pub rolls: Box<dyn RollSource>,
}

impl Arena {
    /// Normalizes both combatants on the way in.
    pub fn new(
        mut player: Combatant,
        mut enemy: Combatant,
        enemy_action: Action,
        rolls: Box<dyn RollSource>,
    ) -> Self {
        player.normalize();
        enemy.normalize();
        Self {
            player,
            enemy,
            enemy_action,
            rolls,
        }
    }
}

/// Cheaply cloneable handle; clones drive the same arena.
#[derive(Clone)]
pub struct BattleOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    arena: Mutex<Arena>,
    is_battling: AtomicBool,
    failure_stack_bonus: f32,
    restore_between_battles: bool,
    pacer: Arc<dyn Pacer>,
    bus: EventBus,
}

/// Clears the battling flag when the battle future finishes or is dropped.
struct BattlingGuard<'a>(&'a AtomicBool);

impl Drop for BattlingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BattleOrchestrator {
    pub fn new(
        arena: Arena,
        failure_stack_bonus: f32,
        restore_between_battles: bool,
        pacer: Arc<dyn Pacer>,
        bus: EventBus,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                arena: Mutex::new(arena),
                is_battling: AtomicBool::new(false),
                failure_stack_bonus,
                restore_between_battles,
                pacer,
                bus,
            }),
        }
    }

    pub fn is_battling(&self) -> bool {
        self.inner.is_battling.load(Ordering::Acquire)
    }

    /// Current player and enemy.
    pub async fn combatants(&self) -> (Combatant, Combatant) {
        let arena = self.inner.arena.lock().await;
        (arena.player.clone(), arena.enemy.clone())
    }

    /// Refill both combatants to full HP. Failure stacks are kept.
    pub async fn restore_combatants(&self) {
        let mut arena = self.inner.arena.lock().await;
        arena.player.restore();
        arena.enemy.restore();
    }

    /// Run a full battle with `player_action` and return its result.
    ///
    /// Fails without touching the arena when no action is given or when a
    /// battle is already running. Exactly one [`BattleEvent::Ended`] is
    /// published per battle that starts.
    pub async fn begin_battle(&self, player_action: Option<Action>) -> Result<BattleResult> {
        let Some(action) = player_action else {
            warn!("battle requested without a player action");
            return Err(RuntimeError::MissingPlayerAction);
        };

        if self.inner.is_battling.swap(true, Ordering::AcqRel) {
            warn!("battle already in progress; ignoring start request");
            return Err(RuntimeError::BattleInProgress);
        }
        let guard = BattlingGuard(&self.inner.is_battling);

        if self.inner.restore_between_battles {
            self.restore_combatants().await;
        }

        info!(
            success_chance = action.success_chance(),
            "battle started"
        );
        self.inner.bus.publish(BattleEvent::Started {
            player_action: action,
        });

        let result = self.run(&action).await;
        drop(guard);

        info!(
            winner = result.winner_name(),
            rounds = result.rounds(),
            "battle ended"
        );
        self.inner.bus.publish(BattleEvent::Ended(result.clone()));
        Ok(result)
    }

    async fn run(&self, action: &Action) -> BattleResult {
        let mut round = 1;
        let mut rounds_played = 0;

        loop {
            let report = {
                let mut arena = self.inner.arena.lock().await;
                let Arena {
                    player,
                    enemy,
                    enemy_action,
                    rolls,
                } = &mut *arena;
                let mut battle = Battle::new(player, enemy, enemy_action, self.inner.failure_stack_bonus)
                    .starting_at_round(round);
                if battle.is_over() {
                    break;
                }

                self.inner.bus.publish(BattleEvent::RoundStarted { round });
                let report = battle.play_round(rolls.as_mut(), action);
                round = battle.round();
                report
            };

            if report.player_turn.is_some() {
                rounds_played += 1;
            }
            self.publish_round(&report);

            if report.status.is_over() {
                break;
            }
            self.inner.pacer.pause(Pause::Turn).await;
        }

        let arena = self.inner.arena.lock().await;
        BattleResult::new(
            arena.player.is_alive(),
            arena.player.clone(),
            arena.enemy.clone(),
            rounds_played,
        )
    }

    fn publish_round(&self, report: &RoundReport) {
        for turn in [&report.player_turn, &report.enemy_turn].into_iter().flatten() {
            debug!(
                round = report.round,
                actor = %turn.actor,
                roll = turn.roll,
                chance = turn.adjusted_chance,
                outcome = %turn.outcome,
                target_hp = turn.target_hp,
                "turn resolved"
            );
            self.inner.bus.publish(BattleEvent::TurnResolved(turn.clone()));
        }
    }
}
