//! Action domain - stochastic choices with a success and a failure effect.
//!
//! # Module Structure
//!
//! - `effect`: HP deltas applied to actor and target
//! - `profile`: raw action data ([`ActionProfile`]) and its normalized form ([`Action`])
//!
//! Rules only ever consume [`Action`]. Data that arrives from configuration
//! or a choice source is an [`ActionProfile`] until it has been normalized,
//! so "chance out of range" and "effect missing" cannot reach resolution.

pub mod effect;
pub mod profile;

pub use effect::Effect;
pub use profile::{Action, ActionProfile};

/// Which branch of an action was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}
