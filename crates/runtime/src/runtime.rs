//! High-level runtime assembly.
//!
//! The runtime owns the shared event bus and wires the battle orchestrator,
//! progression tracker, and session flow together. Everything it hands out is
//! a cheap clone over shared state, so clients can drive the flow from one
//! task while rendering events from another.

use std::sync::Arc;

use tokio::sync::broadcast;

use game_core::{
    Action, ActionProfile, ChoiceSet, ChoiceSource, Combatant, PcgRng, Progression, RollSource,
    StaticChoices, Transition,
};

use crate::api::Result;
use crate::battle::{Arena, BattleOrchestrator};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::flow::FlowController;
use crate::pacing::{Pacer, TimedPacer};
use crate::progression::ProgressionTracker;
use crate::rolls::EntropyRolls;

pub struct Runtime {
    config: RuntimeConfig,
    bus: EventBus,
    battles: BattleOrchestrator,
    progression: ProgressionTracker,
    flow: FlowController,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe to a single topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn battles(&self) -> BattleOrchestrator {
        self.battles.clone()
    }

    pub fn progression(&self) -> ProgressionTracker {
        self.progression.clone()
    }

    pub fn flow(&self) -> FlowController {
        self.flow.clone()
    }

    /// Enter the first choice phase.
    pub async fn start(&self) -> Result<Transition> {
        self.flow.start().await
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    player: Option<Combatant>,
    enemy: Option<Combatant>,
    enemy_action: Option<ActionProfile>,
    choices: Option<Box<dyn ChoiceSource>>,
    rolls: Option<Box<dyn RollSource>>,
    pacer: Option<Arc<dyn Pacer>>,
    progression: Option<Progression>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            player: None,
            enemy: None,
            enemy_action: None,
            choices: None,
            rolls: None,
            pacer: None,
            progression: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Player combatant (default: "Player" at 10/10 HP)
    pub fn player(mut self, player: Combatant) -> Self {
        self.player = Some(player);
        self
    }

    /// Enemy combatant (default: "Enemy" at 10/10 HP)
    pub fn enemy(mut self, enemy: Combatant) -> Self {
        self.enemy = Some(enemy);
        self
    }

    /// The enemy's fixed action; normalized on build (default: the default action)
    pub fn enemy_action(mut self, profile: ActionProfile) -> Self {
        self.enemy_action = Some(profile);
        self
    }

    /// Choice source (default: the standard three labeled cards)
    pub fn choices(mut self, source: impl ChoiceSource + 'static) -> Self {
        self.choices = Some(Box::new(source));
        self
    }

    /// Roll source; overrides the configured seed
    pub fn rolls(mut self, rolls: impl RollSource + 'static) -> Self {
        self.rolls = Some(Box::new(rolls));
        self
    }

    /// Pacer (default: [`TimedPacer`] with the configured delays)
    pub fn pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Some(Arc::new(pacer));
        self
    }

    /// Resume from saved progression instead of level 1
    pub fn progression(mut self, progression: Progression) -> Self {
        self.progression = Some(progression);
        self
    }

    pub fn build(self) -> Runtime {
        let config = self.config;
        let bus = EventBus::with_capacity(config.event_buffer_size);

        let rolls: Box<dyn RollSource> = match (self.rolls, config.seed) {
            (Some(rolls), _) => rolls,
            (None, Some(seed)) => Box::new(PcgRng::new(seed)),
            (None, None) => Box::new(EntropyRolls::new()),
        };
        let pacer: Arc<dyn Pacer> = match self.pacer {
            Some(pacer) => pacer,
            None => Arc::new(TimedPacer::new(config.pacing)),
        };
        let enemy_action = self
            .enemy_action
            .map(|profile| profile.normalize())
            .unwrap_or_else(Action::default);

        let arena = Arena::new(
            self.player.unwrap_or_else(|| Combatant::new("Player")),
            self.enemy.unwrap_or_else(|| Combatant::new("Enemy")),
            enemy_action,
            rolls,
        );
        let battles = BattleOrchestrator::new(
            arena,
            config.game.failure_stack_bonus,
            config.restore_between_battles,
            Arc::clone(&pacer),
            bus.clone(),
        );

        let progression = match self.progression {
            Some(saved) => ProgressionTracker::from_progression(saved, bus.clone()),
            None => ProgressionTracker::new(&config.game, bus.clone()),
        };

        let choices: Box<dyn ChoiceSource> = match self.choices {
            Some(choices) => choices,
            None => Box::new(StaticChoices::new(ChoiceSet::standard())),
        };
        let flow = FlowController::new(
            choices,
            battles.clone(),
            progression.clone(),
            pacer,
            bus.clone(),
        );

        tracing::debug!(
            seed = ?config.seed,
            restore = config.restore_between_battles,
            "runtime built"
        );

        Runtime {
            config,
            bus,
            battles,
            progression,
            flow,
        }
    }
}
