//! Prints runtime events as a running commentary.

use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use game_core::Outcome;
use runtime::{BattleEvent, Event, FlowController, FlowEvent, ProgressionEvent};

pub struct Narrator {
    flow: FlowController,
    battle: Receiver<Event>,
    progression: Receiver<Event>,
    session: Receiver<Event>,
}

impl Narrator {
    pub fn new(
        flow: FlowController,
        battle: Receiver<Event>,
        progression: Receiver<Event>,
        session: Receiver<Event>,
    ) -> Self {
        Self {
            flow,
            battle,
            progression,
            session,
        }
    }

    /// Runs until every publisher is gone.
    pub async fn run(mut self) {
        loop {
            // Topics are polled in publish order so a finished battle is told
            // before the next menu appears.
            let received = tokio::select! {
                biased;
                event = self.battle.recv() => event,
                event = self.progression.recv() => event,
                event = self.session.recv() => event,
            };

            match received {
                Ok(event) => self.narrate(event).await,
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "narrator fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    }

    async fn narrate(&self, event: Event) {
        match event {
            Event::Battle(event) => narrate_battle(event),
            Event::Progression(event) => narrate_progression(event),
            Event::Flow(FlowEvent::StateChanged { from, to }) => {
                debug!(%from, %to, "phase");
            }
            Event::Flow(FlowEvent::ChoicesChanged { .. }) => {
                let choices = self.flow.choices().await;
                println!();
                println!("Choose your approach:");
                for (index, card) in choices.iter().enumerate() {
                    println!(
                        "  {}) {:<8} {:>3.0}% to land",
                        index + 1,
                        choices.label(index),
                        card.action.success_chance() * 100.0
                    );
                }
                println!("Enter a number, or q to quit.");
            }
        }
    }
}

fn narrate_battle(event: BattleEvent) {
    match event {
        BattleEvent::Started { .. } => println!("\n-- Battle! --"),
        BattleEvent::RoundStarted { round } => println!("Round {round}"),
        BattleEvent::TurnResolved(turn) => {
            let verdict = match turn.outcome {
                Outcome::Success => "hits",
                Outcome::Failure => "misses",
            };
            println!(
                "  {} {} (rolled {:.2} against {:.2}). {}: {}/{} HP",
                turn.actor,
                verdict,
                turn.roll,
                turn.adjusted_chance,
                turn.target,
                turn.target_hp,
                turn.target_max_hp
            );
        }
        BattleEvent::Ended(result) => println!(
            "{} wins after {} round(s).",
            result.winner_name(),
            result.rounds()
        ),
    }
}

fn narrate_progression(event: ProgressionEvent) {
    match event {
        ProgressionEvent::LevelUp { level } => println!("Level up! Now level {level}."),
        ProgressionEvent::XpGained {
            amount,
            level,
            current_xp,
            xp_to_next_level,
        } => println!("+{amount} XP (level {level}, {current_xp}/{xp_to_next_level})"),
    }
}
