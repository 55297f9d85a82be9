//! HP deltas applied when an action resolves.

use crate::state::Combatant;

/// Additive HP change for both sides of a resolved action.
///
/// Deltas are applied independently and each is clamped into the receiving
/// combatant's `[0, max_hp]` range. Negative values damage, positive values heal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Effect {
    pub actor_hp_delta: i32,
    pub target_hp_delta: i32,
}

impl Effect {
    /// The zero effect. Substituted for missing effects during normalization.
    pub const NONE: Self = Self {
        actor_hp_delta: 0,
        target_hp_delta: 0,
    };

    pub const fn new(actor_hp_delta: i32, target_hp_delta: i32) -> Self {
        Self {
            actor_hp_delta,
            target_hp_delta,
        }
    }

    /// Effect that only changes the target.
    pub const fn on_target(target_hp_delta: i32) -> Self {
        Self::new(0, target_hp_delta)
    }

    /// Effect that only changes the actor.
    pub const fn on_actor(actor_hp_delta: i32) -> Self {
        Self::new(actor_hp_delta, 0)
    }

    pub const fn is_none(&self) -> bool {
        self.actor_hp_delta == 0 && self.target_hp_delta == 0
    }

    pub fn apply(&self, actor: &mut Combatant, target: &mut Combatant) {
        actor.apply_hp_delta(self.actor_hp_delta);
        target.apply_hp_delta(self.target_hp_delta);
    }
}
