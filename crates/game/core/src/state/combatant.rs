/// Health and failure-stack record for one side of a duel.
///
/// # Invariants
///
/// - `max_hp >= 1`
/// - `0 <= current_hp <= max_hp`
///
/// The failure stack is unsigned, so it can never go negative. It only grows:
/// resetting it is a caller decision, not something the rules do.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    display_name: String,
    max_hp: i32,
    current_hp: i32,
    failure_stack: u32,
}

impl Combatant {
    pub const DEFAULT_MAX_HP: i32 = 10;
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    /// Creates a combatant at full default health.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            max_hp: Self::DEFAULT_MAX_HP,
            current_hp: Self::DEFAULT_MAX_HP,
            failure_stack: 0,
        }
    }

    /// Sets both HP values, clamping them into a valid range.
    ///
    /// `max_hp` is floored at 1 and `current_hp` is clamped into `[0, max_hp]`.
    #[must_use]
    pub fn with_hp(mut self, max_hp: i32, current_hp: i32) -> Self {
        self.max_hp = max_hp.max(1);
        self.current_hp = current_hp.clamp(0, self.max_hp);
        self
    }

    #[must_use]
    pub fn with_failure_stack(mut self, failure_stack: u32) -> Self {
        self.failure_stack = failure_stack;
        self
    }

    /// Name used in narration. Blank names fall back to [`Self::UNKNOWN_NAME`].
    pub fn display_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            Self::UNKNOWN_NAME
        } else {
            &self.display_name
        }
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    pub fn failure_stack(&self) -> u32 {
        self.failure_stack
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Adds `delta` to current HP, clamped into `[0, max_hp]`.
    pub fn apply_hp_delta(&mut self, delta: i32) {
        self.current_hp = self.current_hp.saturating_add(delta).clamp(0, self.max_hp);
    }

    /// Removes `amount` HP, never dropping below zero. Negative amounts are ignored.
    pub fn take_damage(&mut self, amount: i32) {
        self.current_hp = self.current_hp.saturating_sub(amount.max(0)).max(0);
    }

    /// Records one failed action by this combatant.
    pub fn record_failure(&mut self) {
        self.failure_stack = self.failure_stack.saturating_add(1);
    }

    /// Refills HP to maximum. The failure stack is left untouched.
    pub fn restore(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Load-time normalization.
    ///
    /// Floors `max_hp` at 1 and clamps `current_hp` into `[1, max_hp]`, so a
    /// freshly loaded combatant always starts alive.
    pub fn normalize(&mut self) {
        self.max_hp = self.max_hp.max(1);
        self.current_hp = self.current_hp.clamp(1, self.max_hp);
    }
}

impl Default for Combatant {
    fn default() -> Self {
        Self::new(Self::UNKNOWN_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_stays_within_bounds_after_any_deltas() {
        let mut combatant = Combatant::new("Player");
        let deltas = [-3, 25, -100, 7, i32::MIN, i32::MAX, -9, 4, 0, -1];

        for delta in deltas {
            combatant.apply_hp_delta(delta);
            assert!(combatant.current_hp() >= 0);
            assert!(combatant.current_hp() <= combatant.max_hp());
        }
    }

    #[test]
    fn healing_caps_at_max() {
        let mut combatant = Combatant::new("Player").with_hp(10, 4);
        combatant.apply_hp_delta(50);
        assert_eq!(combatant.current_hp(), 10);
    }

    #[test]
    fn take_damage_floors_at_zero_and_ignores_negative() {
        let mut combatant = Combatant::new("Enemy");
        combatant.take_damage(-5);
        assert_eq!(combatant.current_hp(), 10);
        combatant.take_damage(12);
        assert_eq!(combatant.current_hp(), 0);
        assert!(!combatant.is_alive());
    }

    #[test]
    fn blank_name_falls_back() {
        assert_eq!(Combatant::new("   ").display_name(), "Unknown");
        assert_eq!(Combatant::new("Slime").display_name(), "Slime");
    }

    #[test]
    fn normalize_revives_and_floors_max() {
        let mut combatant = Combatant::new("Player").with_hp(0, 0);
        combatant.normalize();
        assert_eq!(combatant.max_hp(), 1);
        assert_eq!(combatant.current_hp(), 1);
    }

    #[test]
    fn restore_keeps_failure_stack() {
        let mut combatant = Combatant::new("Player").with_failure_stack(3);
        combatant.apply_hp_delta(-8);
        combatant.restore();
        assert_eq!(combatant.current_hp(), 10);
        assert_eq!(combatant.failure_stack(), 3);
    }
}
