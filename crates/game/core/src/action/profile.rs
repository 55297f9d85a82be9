//! Action data and normalization.
//!
//! [`ActionProfile`] is the loadable shape: any chance, effects optional.
//! [`ActionProfile::normalize`] turns it into an [`Action`], whose chance is
//! in `[0, 1]` and whose effects are always present.

use super::effect::Effect;

/// Raw action data as authored in configuration or produced by a choice source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionProfile {
    pub success_chance: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_success: Option<Effect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_failure: Option<Effect>,
}

impl ActionProfile {
    pub fn new(success_chance: f32) -> Self {
        Self {
            success_chance,
            on_success: None,
            on_failure: None,
        }
    }

    #[must_use]
    pub fn on_success(mut self, effect: Effect) -> Self {
        self.on_success = Some(effect);
        self
    }

    #[must_use]
    pub fn on_failure(mut self, effect: Effect) -> Self {
        self.on_failure = Some(effect);
        self
    }

    /// Clamps the chance into `[0, 1]` (NaN becomes `0`) and substitutes
    /// [`Effect::NONE`] for missing effects.
    pub fn normalize(&self) -> Action {
        Action::new(
            self.success_chance,
            self.on_success.unwrap_or(Effect::NONE),
            self.on_failure.unwrap_or(Effect::NONE),
        )
    }
}

impl Default for ActionProfile {
    fn default() -> Self {
        Action::default().into()
    }
}

impl From<Action> for ActionProfile {
    fn from(action: Action) -> Self {
        Self {
            success_chance: action.success_chance,
            on_success: Some(action.on_success),
            on_failure: Some(action.on_failure),
        }
    }
}

/// Normalized stochastic choice.
///
/// # Invariants
///
/// - `success_chance` is finite and within `[0, 1]`
/// - both effects are present
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Action {
    success_chance: f32,
    on_success: Effect,
    on_failure: Effect,
}

impl Action {
    pub const DEFAULT_SUCCESS_CHANCE: f32 = 0.7;
    pub const DEFAULT_ON_SUCCESS: Effect = Effect::on_target(-2);
    pub const DEFAULT_ON_FAILURE: Effect = Effect::on_actor(-1);

    pub fn new(success_chance: f32, on_success: Effect, on_failure: Effect) -> Self {
        Self {
            success_chance: clamp01(success_chance),
            on_success,
            on_failure,
        }
    }

    pub fn success_chance(&self) -> f32 {
        self.success_chance
    }

    pub fn on_success(&self) -> Effect {
        self.on_success
    }

    pub fn on_failure(&self) -> Effect {
        self.on_failure
    }

    /// Effect for the given branch.
    pub fn effect_for(&self, outcome: super::Outcome) -> Effect {
        match outcome {
            super::Outcome::Success => self.on_success,
            super::Outcome::Failure => self.on_failure,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_SUCCESS_CHANCE,
            Self::DEFAULT_ON_SUCCESS,
            Self::DEFAULT_ON_FAILURE,
        )
    }
}

impl From<&ActionProfile> for Action {
    fn from(profile: &ActionProfile) -> Self {
        profile.normalize()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Route through the profile so deserialized actions are normalized too.
        ActionProfile::deserialize(deserializer).map(|profile| profile.normalize())
    }
}

/// Clamps into `[0, 1]`, mapping NaN to `0`.
pub(crate) fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
