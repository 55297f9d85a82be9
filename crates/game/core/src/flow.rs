//! Session phases and the transitions between them.
//!
//! ```text
//! None --start--> Choice --choice_selected--> Battle --battle_ended--> Result
//!   Result --progression_applied--> LevelUp --level_up_settled--> Choice
//! ```
//!
//! `battle_ended` is also accepted from `Result` and `LevelUp`: a newer battle
//! result restarts the post-battle phase instead of being dropped. From
//! `None` or `Choice` it is stale and rejected.
//!
//! `battle_aborted` returns `Battle` to `Choice` when the selected battle
//! could not start.

use crate::error::{ErrorSeverity, GameError};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowState {
    #[default]
    None,
    Choice,
    Battle,
    Result,
    LevelUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FlowTrigger {
    Start,
    ChoiceSelected,
    BattleEnded,
    BattleAborted,
    ProgressionApplied,
    LevelUpSettled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub from: FlowState,
    pub to: FlowState,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("{trigger} not accepted in {state} state")]
    Rejected {
        trigger: FlowTrigger,
        state: FlowState,
    },
}

impl GameError for FlowError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "FLOW_TRIGGER_REJECTED"
    }
}

/// Holds the single active [`FlowState`]; [`FlowMachine::fire`] is the only
/// way it changes.
#[derive(Clone, Debug, Default)]
pub struct FlowMachine {
    state: FlowState,
}

impl FlowMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Target state for `trigger` from `state`, if the edge exists.
    pub fn target(state: FlowState, trigger: FlowTrigger) -> Option<FlowState> {
        use FlowState as S;
        use FlowTrigger as T;

        match (trigger, state) {
            (T::Start, S::None) => Some(S::Choice),
            (T::ChoiceSelected, S::Choice) => Some(S::Battle),
            (T::BattleEnded, S::Battle | S::Result | S::LevelUp) => Some(S::Result),
            (T::BattleAborted, S::Battle) => Some(S::Choice),
            (T::ProgressionApplied, S::Result) => Some(S::LevelUp),
            (T::LevelUpSettled, S::LevelUp) => Some(S::Choice),
            _ => None,
        }
    }

    pub fn fire(&mut self, trigger: FlowTrigger) -> Result<Transition, FlowError> {
        let from = self.state;
        let to = Self::target(from, trigger).ok_or(FlowError::Rejected {
            trigger,
            state: from,
        })?;
        self.state = to;
        Ok(Transition { from, to })
    }
}
