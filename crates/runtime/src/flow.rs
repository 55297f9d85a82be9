//! Session flow: choice, battle, result, level-up, and back to choice.
//!
//! [`FlowController`] drives a [`FlowMachine`] and publishes one
//! [`FlowEvent::StateChanged`] per transition. Once a choice is accepted the
//! battle runs in a task owned by the controller, so dropping the caller's
//! future cannot strand the session in `Battle`. After a battle the remaining
//! phases run in a spawned continuation. A newer battle result aborts the
//! running continuation before starting its own, so a late result can never
//! advance the session twice.
//!
//! Lock order is machine, then continuation slot or choices.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use game_core::{
    Action, BattleResult, ChoiceSet, ChoiceSource, FlowError, FlowMachine, FlowState, FlowTrigger,
    Transition, XpGain,
};

use crate::api::{Result, RuntimeError};
use crate::battle::BattleOrchestrator;
use crate::events::{EventBus, FlowEvent};
use crate::pacing::{Pacer, Pause};
use crate::progression::ProgressionTracker;

/// What one pass through the battle phases produced.
#[derive(Debug, Clone)]
pub struct BattleSummary {
    pub result: BattleResult,
    pub gain: XpGain,
}

/// The post-battle phases still running in the background.
#[derive(Debug)]
pub struct PostBattle {
    gain: XpGain,
    handle: JoinHandle<()>,
}

impl PostBattle {
    /// Experience granted when the result phase began.
    pub fn gain(&self) -> &XpGain {
        &self.gain
    }

    /// Wait until the flow is back in the choice phase.
    ///
    /// Fails with [`RuntimeError::ContinuationSuperseded`] if a newer battle
    /// result took over first.
    pub async fn settled(self) -> Result<XpGain> {
        let Self { gain, handle } = self;
        match handle.await {
            Ok(()) => Ok(gain),
            Err(err) if err.is_cancelled() => Err(RuntimeError::ContinuationSuperseded),
            Err(err) => Err(RuntimeError::ContinuationJoin(err)),
        }
    }
}

struct Continuation {
    generation: u64,
    abort: AbortHandle,
}

/// Cheaply cloneable handle to the session flow.
#[derive(Clone)]
pub struct FlowController {
    inner: Arc<Inner>,
}

struct Inner {
    machine: Mutex<FlowMachine>,
    choices: Mutex<Box<dyn ChoiceSource>>,
    continuation: Mutex<Option<Continuation>>,
    generation: AtomicU64,
    battles: BattleOrchestrator,
    progression: ProgressionTracker,
    pacer: Arc<dyn Pacer>,
    bus: EventBus,
}

impl FlowController {
    pub fn new(
        choices: Box<dyn ChoiceSource>,
        battles: BattleOrchestrator,
        progression: ProgressionTracker,
        pacer: Arc<dyn Pacer>,
        bus: EventBus,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                machine: Mutex::new(FlowMachine::new()),
                choices: Mutex::new(choices),
                continuation: Mutex::new(None),
                generation: AtomicU64::new(0),
                battles,
                progression,
                pacer,
                bus,
            }),
        }
    }

    pub async fn state(&self) -> FlowState {
        self.inner.machine.lock().await.state()
    }

    /// Choices currently on offer.
    pub async fn choices(&self) -> ChoiceSet {
        self.inner.choices.lock().await.choices().clone()
    }

    /// Enter the choice phase for the first time.
    pub async fn start(&self) -> Result<Transition> {
        let mut machine = self.inner.machine.lock().await;
        let transition = self.fire(&mut machine, FlowTrigger::Start)?;
        let count = self.inner.choices.lock().await.choices().len();
        self.inner.bus.publish(FlowEvent::ChoicesChanged { count });
        Ok(transition)
    }

    /// Pick choice `index`, fight the battle, and wait for the flow to return
    /// to the choice phase.
    ///
    /// Rejected without side effects outside the choice phase, for an
    /// out-of-range index, or while a battle is already running. Once
    /// accepted, the battle and the post-battle phases finish even if the
    /// returned future is dropped.
    pub async fn select_choice(&self, index: usize) -> Result<BattleSummary> {
        let action = {
            let mut machine = self.inner.machine.lock().await;
            let state = machine.state();
            if FlowMachine::target(state, FlowTrigger::ChoiceSelected).is_none() {
                let err = FlowError::Rejected {
                    trigger: FlowTrigger::ChoiceSelected,
                    state,
                };
                warn!(%err, index, "choice ignored");
                return Err(err.into());
            }

            let action = self
                .inner
                .choices
                .lock()
                .await
                .choices()
                .select(index)
                .inspect_err(|err| warn!(%err, "choice ignored"))?;

            if self.inner.battles.is_battling() {
                warn!(index, "choice ignored; battle already in progress");
                return Err(RuntimeError::BattleInProgress);
            }

            self.fire(&mut machine, FlowTrigger::ChoiceSelected)?;
            action
        };

        info!(index, success_chance = action.success_chance(), "choice selected");
        let flow = self.clone();
        tokio::spawn(async move { flow.fight(action).await })
            .await
            .map_err(RuntimeError::BattleJoin)?
    }

    async fn fight(self, action: Action) -> Result<BattleSummary> {
        let result = match self.inner.battles.begin_battle(Some(action)).await {
            Ok(result) => result,
            Err(err) => {
                let mut machine = self.inner.machine.lock().await;
                self.fire(&mut machine, FlowTrigger::BattleAborted).ok();
                return Err(err);
            }
        };
        let gain = self.on_battle_ended(result.clone()).await?.settled().await?;

        Ok(BattleSummary { result, gain })
    }

    /// Enter the result phase for `result` and schedule the rest of the
    /// post-battle phases.
    ///
    /// Any continuation still running from an earlier result is aborted
    /// first. A result arriving in the none or choice phase is stale and
    /// rejected.
    pub async fn on_battle_ended(&self, result: BattleResult) -> Result<PostBattle> {
        let mut machine = self.inner.machine.lock().await;
        self.fire(&mut machine, FlowTrigger::BattleEnded)?;

        let mut slot = self.inner.continuation.lock().await;
        if let Some(previous) = slot.take() {
            debug!(generation = previous.generation, "superseding post-battle advance");
            previous.abort.abort();
        }

        let gain = self.inner.progression.apply_battle_result(&result).await;
        info!(
            player_won = result.player_won(),
            xp = gain.amount,
            levels = gain.levels_reached.len(),
            "battle result applied"
        );

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let flow = self.clone();
        let handle = tokio::spawn(async move { flow.advance_after_battle(generation).await });
        *slot = Some(Continuation {
            generation,
            abort: handle.abort_handle(),
        });

        Ok(PostBattle { gain, handle })
    }

    async fn advance_after_battle(self, generation: u64) {
        self.inner.pacer.pause(Pause::Result).await;
        {
            let mut machine = self.inner.machine.lock().await;
            if self.fire(&mut machine, FlowTrigger::ProgressionApplied).is_err() {
                return;
            }
        }

        self.inner.pacer.pause(Pause::LevelUp).await;
        {
            let mut machine = self.inner.machine.lock().await;
            if self.fire(&mut machine, FlowTrigger::LevelUpSettled).is_err() {
                return;
            }
            let count = {
                let mut choices = self.inner.choices.lock().await;
                choices.refresh();
                choices.choices().len()
            };
            self.inner.bus.publish(FlowEvent::ChoicesChanged { count });
        }

        let mut slot = self.inner.continuation.lock().await;
        if slot.as_ref().is_some_and(|c| c.generation == generation) {
            *slot = None;
        }
    }

    fn fire(&self, machine: &mut FlowMachine, trigger: FlowTrigger) -> Result<Transition> {
        match machine.fire(trigger) {
            Ok(transition) => {
                info!(from = %transition.from, to = %transition.to, "flow state changed");
                self.inner.bus.publish(FlowEvent::StateChanged {
                    from: transition.from,
                    to: transition.to,
                });
                Ok(transition)
            }
            Err(err) => {
                warn!(%err, "flow trigger rejected");
                Err(err.into())
            }
        }
    }
}
