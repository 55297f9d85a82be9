//! Runtime configuration structures and loaders.
use std::env;
use std::time::Duration;

use game_core::GameConfig;

use crate::events::EventBus;
use crate::pacing::PacingConfig;

/// Runtime configuration shared across the orchestrators.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub pacing: PacingConfig,
    pub event_buffer_size: usize,
    /// Seed for replayable sessions; entropy is used when absent.
    pub seed: Option<u64>,
    /// Refill both combatants before every battle.
    pub restore_between_battles: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            pacing: PacingConfig::default(),
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
            seed: None,
            restore_between_battles: false,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUEL_FAILURE_STACK_BONUS` - Chance added per stacked failure (default: 0.05)
    /// - `DUEL_WIN_XP` - Experience for a win (default: 3)
    /// - `DUEL_LOSS_XP` - Experience for a loss (default: 1)
    /// - `DUEL_XP_GROWTH` - Threshold growth factor per level (default: 1.2)
    /// - `DUEL_TURN_DELAY_MS` - Pause after each round (default: 250)
    /// - `DUEL_RESULT_DELAY_MS` - Pause in the result phase (default: 500)
    /// - `DUEL_LEVEL_UP_DELAY_MS` - Pause in the level-up phase (default: 500)
    /// - `DUEL_SEED` - Seed for replayable rolls (default: entropy)
    /// - `DUEL_RESTORE_HP` - Refill HP between battles (default: false)
    /// - `DUEL_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        Self::from_env_with(Self::default())
    }

    /// Like [`RuntimeConfig::from_env`], but unset variables fall back to
    /// `defaults` instead of [`RuntimeConfig::default`].
    pub fn from_env_with(defaults: Self) -> Self {
        Self::from_lookup(defaults, |key| env::var(key).ok())
    }

    fn from_lookup(defaults: Self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = defaults;

        if let Some(bonus) = parse(&lookup, "DUEL_FAILURE_STACK_BONUS") {
            config.game = config.game.with_failure_stack_bonus(bonus);
        }
        if let Some(win) = parse(&lookup, "DUEL_WIN_XP") {
            config.game.win_xp = win;
        }
        if let Some(loss) = parse(&lookup, "DUEL_LOSS_XP") {
            config.game.loss_xp = loss;
        }
        if let Some(factor) = parse(&lookup, "DUEL_XP_GROWTH") {
            config.game = config.game.with_xp_growth_factor(factor);
        }

        if let Some(ms) = parse(&lookup, "DUEL_TURN_DELAY_MS") {
            config.pacing.turn_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse(&lookup, "DUEL_RESULT_DELAY_MS") {
            config.pacing.result_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse(&lookup, "DUEL_LEVEL_UP_DELAY_MS") {
            config.pacing.level_up_delay = Duration::from_millis(ms);
        }

        if let Some(seed) = parse(&lookup, "DUEL_SEED") {
            config.seed = Some(seed);
        }

        if let Some(restore) = parse::<bool>(&lookup, "DUEL_RESTORE_HP") {
            config.restore_between_battles = restore;
        } else if lookup("DUEL_RESTORE_HP").is_some_and(|value| value.trim().is_empty()) {
            // Also accept just setting the variable without value as "true"
            config.restore_between_battles = true;
        }

        if let Some(capacity) = parse::<usize>(&lookup, "DUEL_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }
}

fn parse<T>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn restoring() -> RuntimeConfig {
        RuntimeConfig {
            restore_between_battles: true,
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn unset_variables_keep_the_given_defaults() {
        let config = RuntimeConfig::from_lookup(restoring(), lookup(&[]));
        assert!(config.restore_between_battles);
        assert_eq!(config.seed, None);
        assert_eq!(config.pacing, PacingConfig::default());

        let config = RuntimeConfig::from_lookup(RuntimeConfig::default(), lookup(&[]));
        assert!(!config.restore_between_battles);
    }

    #[test]
    fn restore_flag_overrides_defaults() {
        let config = RuntimeConfig::from_lookup(restoring(), lookup(&[("DUEL_RESTORE_HP", "false")]));
        assert!(!config.restore_between_battles);

        let config =
            RuntimeConfig::from_lookup(RuntimeConfig::default(), lookup(&[("DUEL_RESTORE_HP", "")]));
        assert!(config.restore_between_battles);
    }

    #[test]
    fn bad_values_are_ignored() {
        let config = RuntimeConfig::from_lookup(
            RuntimeConfig::default(),
            lookup(&[
                ("DUEL_SEED", "7"),
                ("DUEL_TURN_DELAY_MS", "soon"),
                ("DUEL_EVENT_BUFFER", "0"),
                ("DUEL_RESTORE_HP", "maybe"),
            ]),
        );
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pacing.turn_delay, PacingConfig::DEFAULT_TURN_DELAY);
        assert_eq!(config.event_buffer_size, 1);
        assert!(!config.restore_between_battles);
    }
}
