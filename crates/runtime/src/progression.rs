//! Shared experience tracker that publishes level-ups.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use game_core::{BattleResult, GameConfig, Progression, XpGain};

use crate::events::{EventBus, ProgressionEvent};

#[derive(Clone)]
pub struct ProgressionTracker {
    progression: Arc<Mutex<Progression>>,
    bus: EventBus,
}

impl ProgressionTracker {
    pub fn new(config: &GameConfig, bus: EventBus) -> Self {
        Self::from_progression(Progression::new(config), bus)
    }

    /// Resume from a saved progression.
    pub fn from_progression(progression: Progression, bus: EventBus) -> Self {
        Self {
            progression: Arc::new(Mutex::new(progression)),
            bus,
        }
    }

    pub async fn snapshot(&self) -> Progression {
        self.progression.lock().await.clone()
    }

    /// Grant the win or loss reward for `result`.
    pub async fn apply_battle_result(&self, result: &BattleResult) -> XpGain {
        let mut progression = self.progression.lock().await;
        let gain = progression.apply_battle_result(result);
        self.publish(&progression, &gain);
        gain
    }

    pub async fn gain_xp(&self, amount: u32) -> XpGain {
        let mut progression = self.progression.lock().await;
        let gain = progression.gain_xp(amount);
        self.publish(&progression, &gain);
        gain
    }

    fn publish(&self, progression: &Progression, gain: &XpGain) {
        if gain.amount == 0 {
            return;
        }

        for &level in &gain.levels_reached {
            info!(level, "level up");
            self.bus.publish(ProgressionEvent::LevelUp { level });
        }
        self.bus.publish(ProgressionEvent::XpGained {
            amount: gain.amount,
            level: progression.level(),
            current_xp: progression.current_xp(),
            xp_to_next_level: progression.xp_to_next_level(),
        });
    }
}
