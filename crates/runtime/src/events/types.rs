//! Event types for different topics.

use game_core::{Action, BattleResult, FlowState, TurnResolution};
use serde::{Deserialize, Serialize};

/// Events emitted while a battle runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A battle began with the player's chosen action.
    Started { player_action: Action },

    /// A round is about to resolve.
    RoundStarted { round: u32 },

    /// One side acted; carries the full resolution for narration.
    TurnResolved(TurnResolution),

    /// Exactly one per battle.
    Ended(BattleResult),
}

/// Events emitted when experience is banked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProgressionEvent {
    /// One per level gained, in order.
    LevelUp { level: u32 },

    /// Summary after a grant has been fully settled.
    XpGained {
        amount: u32,
        level: u32,
        current_xp: u32,
        xp_to_next_level: u32,
    },
}

/// Events emitted by the session flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FlowEvent {
    StateChanged { from: FlowState, to: FlowState },

    /// The offered choices were regenerated.
    ChoicesChanged { count: usize },
}
