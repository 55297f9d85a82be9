//! Combat resolution system.
//!
//! # Architecture
//!
//! - **Resolution**: one actor uses one action on one target (`resolve_turn`)
//! - **Battle**: rounds of player turn then enemy turn until someone drops (`Battle`)
//! - **Duel**: index-driven front-end that plays one round per call (`Duel`)
//!
//! Everything here is synchronous and draws randomness only through the
//! injected [`RollSource`](crate::env::RollSource). Pacing, events and logging
//! belong to the runtime.

pub mod battle;
pub mod duel;
pub mod resolution;

pub use battle::{Battle, BattleResult, BattleStatus, RoundReport};
pub use duel::{Duel, DuelError};
pub use resolution::{TurnResolution, adjusted_chance, resolve_turn};
