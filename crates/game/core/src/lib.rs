//! Deterministic duel rules shared by the runtime and headless tools.
//!
//! `game-core` defines the canonical rules (combatants, actions, turn
//! resolution, battle stepping, experience curve, session phases) as plain
//! synchronous APIs. It performs no I/O, never sleeps and draws randomness only
//! through an injected [`RollSource`], so every rule can be exercised in a
//! unit test and replayed from a seed.
pub mod action;
pub mod choice;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod flow;
pub mod progression;
pub mod state;

pub use action::{Action, ActionProfile, Effect, Outcome};
pub use choice::{
    ChoiceCard, ChoiceError, ChoiceSet, ChoiceSource, GeneratedChoices, StaticChoices,
};
pub use combat::{
    Battle, BattleResult, BattleStatus, Duel, DuelError, RoundReport, TurnResolution,
    adjusted_chance, resolve_turn,
};
pub use config::GameConfig;
pub use env::{PcgRng, RollSource, ScriptedRolls};
pub use error::{ErrorSeverity, GameError};
pub use flow::{FlowError, FlowMachine, FlowState, FlowTrigger, Transition};
pub use progression::{Progression, XpGain, XpRewards};
pub use state::Combatant;
