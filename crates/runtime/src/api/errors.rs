//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule rejections from `game-core` and coordination failures from the
//! orchestrators so clients can bubble them up with consistent context.
use game_core::{ChoiceError, ErrorSeverity, FlowError, GameError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("a battle is already in progress")]
    BattleInProgress,

    #[error("battle cannot start without a player action")]
    MissingPlayerAction,

    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("post-battle advance was superseded by a newer battle result")]
    ContinuationSuperseded,

    #[error("post-battle advance task failed")]
    ContinuationJoin(#[source] tokio::task::JoinError),

    #[error("battle task failed")]
    BattleJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Wrapped rule errors keep their own severity; everything else is a
    /// rejected request the caller can retry.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Choice(err) => err.severity(),
            Self::Flow(err) => err.severity(),
            Self::MissingPlayerAction => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BattleInProgress => "RUNTIME_BATTLE_IN_PROGRESS",
            Self::MissingPlayerAction => "RUNTIME_MISSING_PLAYER_ACTION",
            Self::Choice(err) => err.error_code(),
            Self::Flow(err) => err.error_code(),
            Self::ContinuationSuperseded => "RUNTIME_CONTINUATION_SUPERSEDED",
            Self::ContinuationJoin(_) => "RUNTIME_CONTINUATION_JOIN",
            Self::BattleJoin(_) => "RUNTIME_BATTLE_JOIN",
        }
    }
}
