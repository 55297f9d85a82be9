//! Experience and level curve.
//!
//! Formula per level-up:
//!
//! ```text
//! xp_to_next_level' = max(1, round_half_even(xp_to_next_level × growth))
//! ```
//!
//! The product is computed in `f32` and rounded half-to-even. With the default
//! factor the thresholds run 5, 6, 7, 8, 10, 12, 14, ...

use crate::combat::BattleResult;
use crate::config::GameConfig;

/// Experience granted per battle outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XpRewards {
    pub win: u32,
    pub loss: u32,
}

impl XpRewards {
    pub fn for_result(&self, result: &BattleResult) -> u32 {
        if result.player_won() { self.win } else { self.loss }
    }
}

impl From<&GameConfig> for XpRewards {
    fn from(config: &GameConfig) -> Self {
        Self {
            win: config.win_xp,
            loss: config.loss_xp,
        }
    }
}

/// Outcome of one experience grant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XpGain {
    pub amount: u32,
    /// Every level reached by this grant, in order.
    pub levels_reached: Vec<u32>,
}

impl XpGain {
    pub fn leveled_up(&self) -> bool {
        !self.levels_reached.is_empty()
    }
}

/// Level, banked experience and the current threshold.
///
/// # Invariants
///
/// - `level >= 1`
/// - `xp_to_next_level >= 1`, never decreasing
/// - `current_xp < xp_to_next_level` between grants
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    level: u32,
    current_xp: u32,
    xp_to_next_level: u32,
    growth_factor: f32,
    rewards: XpRewards,
}

impl Progression {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next_level: config.initial_xp_to_next_level.max(1),
            growth_factor: config.xp_growth_factor,
            rewards: XpRewards::from(config),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_xp(&self) -> u32 {
        self.current_xp
    }

    pub fn xp_to_next_level(&self) -> u32 {
        self.xp_to_next_level
    }

    pub fn rewards(&self) -> XpRewards {
        self.rewards
    }

    /// Grants the win or loss reward for `result`.
    pub fn apply_battle_result(&mut self, result: &BattleResult) -> XpGain {
        self.gain_xp(self.rewards.for_result(result))
    }

    /// Banks `amount` and settles every level-up it pays for.
    ///
    /// A zero grant is a no-op.
    pub fn gain_xp(&mut self, amount: u32) -> XpGain {
        let mut gain = XpGain {
            amount,
            levels_reached: Vec::new(),
        };
        if amount == 0 {
            return gain;
        }

        self.current_xp = self.current_xp.saturating_add(amount);
        while self.current_xp >= self.xp_to_next_level {
            self.current_xp -= self.xp_to_next_level;
            self.level += 1;
            self.xp_to_next_level = next_threshold(self.xp_to_next_level, self.growth_factor);
            gain.levels_reached.push(self.level);
        }

        gain
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

/// Next level threshold after `current`, floored at `current` and 1.
fn next_threshold(current: u32, growth_factor: f32) -> u32 {
    let scaled = (current as f32 * growth_factor).round_ties_even();
    // Saturating float-to-int cast maps NaN to 0, which the floor lifts back.
    (scaled as u32).max(current).max(1)
}
