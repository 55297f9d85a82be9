//! Pauses between battle rounds and post-battle phases.
//!
//! Orchestrators never sleep directly; they ask a [`Pacer`] to wait. The
//! terminal client uses [`TimedPacer`], tests and headless runs use
//! [`ImmediatePacer`] so a whole session completes without wall-clock time.

use std::time::Duration;

use async_trait::async_trait;

/// Where in the session a pause happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pause {
    /// After a full battle round.
    Turn,
    /// After the result phase has applied progression.
    Result,
    /// After the level-up phase.
    LevelUp,
}

/// Delays used by [`TimedPacer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    pub turn_delay: Duration,
    pub result_delay: Duration,
    pub level_up_delay: Duration,
}

impl PacingConfig {
    pub const DEFAULT_TURN_DELAY: Duration = Duration::from_millis(250);
    pub const DEFAULT_RESULT_DELAY: Duration = Duration::from_millis(500);
    pub const DEFAULT_LEVEL_UP_DELAY: Duration = Duration::from_millis(500);

    /// All delays zero.
    pub const fn immediate() -> Self {
        Self {
            turn_delay: Duration::ZERO,
            result_delay: Duration::ZERO,
            level_up_delay: Duration::ZERO,
        }
    }

    pub fn delay(&self, pause: Pause) -> Duration {
        match pause {
            Pause::Turn => self.turn_delay,
            Pause::Result => self.result_delay,
            Pause::LevelUp => self.level_up_delay,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            turn_delay: Self::DEFAULT_TURN_DELAY,
            result_delay: Self::DEFAULT_RESULT_DELAY,
            level_up_delay: Self::DEFAULT_LEVEL_UP_DELAY,
        }
    }
}

#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait out `pause`. Must yield at least once so other tasks can run
    /// between rounds even when no delay is configured.
    async fn pause(&self, pause: Pause);
}

/// Yields to the scheduler and returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediatePacer;

#[async_trait]
impl Pacer for ImmediatePacer {
    async fn pause(&self, _pause: Pause) {
        tokio::task::yield_now().await;
    }
}

/// Sleeps for the configured delay of each pause.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimedPacer {
    config: PacingConfig,
}

impl TimedPacer {
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PacingConfig {
        &self.config
    }
}

#[async_trait]
impl Pacer for TimedPacer {
    async fn pause(&self, pause: Pause) {
        let delay = self.config.delay(pause);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}
