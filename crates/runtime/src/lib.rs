//! Async orchestration for the duel loop.
//!
//! This crate wraps the synchronous rules in `game-core` with paced battles,
//! experience tracking, and the choice/battle/result/level-up session flow.
//! Consumers build a [`Runtime`], drive it through [`FlowController`], and
//! subscribe to [`EventBus`] topics to render what happens.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the builder that wires everything together
//! - [`api`] exposes the error types downstream clients handle
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`battle`], [`progression`], and [`flow`] are the orchestrators
//! - [`pacing`] and [`rolls`] are the injectable timing and randomness seams
pub mod api;
pub mod battle;
pub mod config;
pub mod events;
pub mod flow;
pub mod pacing;
pub mod progression;
pub mod rolls;
pub mod runtime;

pub use api::{Result, RuntimeError};
pub use battle::{Arena, BattleOrchestrator};
pub use config::RuntimeConfig;
pub use events::{BattleEvent, Event, EventBus, FlowEvent, ProgressionEvent, Topic};
pub use flow::{BattleSummary, FlowController, PostBattle};
pub use pacing::{ImmediatePacer, Pacer, PacingConfig, Pause, TimedPacer};
pub use progression::ProgressionTracker;
pub use rolls::EntropyRolls;
pub use runtime::{Runtime, RuntimeBuilder};
