/// Rule constants and tunable parameters for the duel loop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Success chance added per stacked failure of the acting combatant.
    pub failure_stack_bonus: f32,
    /// Experience granted for a won battle.
    pub win_xp: u32,
    /// Experience granted for a lost battle.
    pub loss_xp: u32,
    /// Multiplier applied to the level threshold on every level-up.
    pub xp_growth_factor: f32,
    /// Threshold for leaving level 1.
    pub initial_xp_to_next_level: u32,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FAILURE_STACK_BONUS: f32 = 0.05;
    pub const DEFAULT_WIN_XP: u32 = 3;
    pub const DEFAULT_LOSS_XP: u32 = 1;
    pub const DEFAULT_XP_GROWTH_FACTOR: f32 = 1.2;
    pub const DEFAULT_XP_TO_NEXT_LEVEL: u32 = 5;

    pub fn new() -> Self {
        Self {
            failure_stack_bonus: Self::DEFAULT_FAILURE_STACK_BONUS,
            win_xp: Self::DEFAULT_WIN_XP,
            loss_xp: Self::DEFAULT_LOSS_XP,
            xp_growth_factor: Self::DEFAULT_XP_GROWTH_FACTOR,
            initial_xp_to_next_level: Self::DEFAULT_XP_TO_NEXT_LEVEL,
        }
    }

    #[must_use]
    pub fn with_failure_stack_bonus(mut self, bonus: f32) -> Self {
        self.failure_stack_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_rewards(mut self, win_xp: u32, loss_xp: u32) -> Self {
        self.win_xp = win_xp;
        self.loss_xp = loss_xp;
        self
    }

    #[must_use]
    pub fn with_xp_growth_factor(mut self, factor: f32) -> Self {
        self.xp_growth_factor = factor;
        self
    }

    #[must_use]
    pub fn with_initial_xp_to_next_level(mut self, threshold: u32) -> Self {
        self.initial_xp_to_next_level = threshold;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
