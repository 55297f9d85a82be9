//! Duel client binary.
//!
//! Reads choice numbers from stdin and narrates the resulting battles.
//!
//! # Examples
//!
//! ```bash
//! # Replayable session with instant pacing
//! DUEL_SEED=7 DUEL_TURN_DELAY_MS=0 cargo run -p duel-client
//!
//! # Verbose logs to a file
//! RUST_LOG=debug DUEL_LOG_DIR=./logs cargo run -p duel-client
//! ```
mod logging;
mod narrator;

use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use game_core::{ActionProfile, ChoiceSet, Combatant, Effect, StaticChoices};
use runtime::{Runtime, RuntimeConfig, Topic};

use narrator::Narrator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let log_dir = std::env::var_os("DUEL_LOG_DIR").map(PathBuf::from);
    let _log_guard = logging::setup_logging(log_dir.as_deref())?;

    // Fights chain against the same enemy, so refill HP unless told otherwise.
    let config = RuntimeConfig::from_env_with(RuntimeConfig {
        restore_between_battles: true,
        ..RuntimeConfig::default()
    });
    tracing::info!(
        seed = ?config.seed,
        restore = config.restore_between_battles,
        "Starting duel"
    );

    let runtime = Runtime::builder()
        .config(config)
        .player(Combatant::new("Hero"))
        .enemy(Combatant::new("Goblin").with_hp(12, 12))
        .enemy_action(ActionProfile::new(0.6).on_success(Effect::on_target(-2)))
        .choices(StaticChoices::new(default_choices()))
        .build();

    let narrator = Narrator::new(
        runtime.flow(),
        runtime.subscribe(Topic::Battle),
        runtime.subscribe(Topic::Progression),
        runtime.subscribe(Topic::Flow),
    );
    let narrator = tokio::spawn(narrator.run());

    runtime.start().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") {
            break;
        }

        let index = match input.parse::<usize>() {
            Ok(number) if number >= 1 => number - 1,
            _ => {
                println!("Enter a choice number, or q to quit.");
                continue;
            }
        };

        if let Err(err) = runtime.flow().select_choice(index).await {
            tracing::warn!(code = err.error_code(), "{err}");
            println!("{err}");
        }
    }

    let progression = runtime.progression().snapshot().await;
    println!(
        "Finished at level {} ({}/{} XP).",
        progression.level(),
        progression.current_xp(),
        progression.xp_to_next_level()
    );

    narrator.abort();
    tracing::info!("Client shutdown complete");
    Ok(())
}

/// Three cards from careful to reckless.
fn default_choices() -> ChoiceSet {
    ChoiceSet::from_profiles(&[
        ActionProfile::new(0.9)
            .on_success(Effect::on_target(-1))
            .on_failure(Effect::NONE),
        ActionProfile::new(0.7)
            .on_success(Effect::on_target(-2))
            .on_failure(Effect::on_actor(-1)),
        ActionProfile::new(0.4)
            .on_success(Effect::on_target(-4))
            .on_failure(Effect::on_actor(-2)),
    ])
    .with_labels(ChoiceSet::STANDARD_LABELS)
}
