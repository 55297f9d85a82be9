//! Topic-based event bus for runtime events.
//!
//! Battles, progression, and session phases publish to their own topics so
//! consumers subscribe only to what they render or log.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BattleEvent, FlowEvent, ProgressionEvent};
