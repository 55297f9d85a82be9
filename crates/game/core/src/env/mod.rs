//! Inputs the rules consume but do not own.
//!
//! The only environment input of the duel rules is randomness. Every roll is
//! drawn through [`RollSource`] so tests and replays can inject a scripted or
//! seeded stream instead of ambient entropy.
mod rng;

pub use rng::{PcgRng, RollSource, ScriptedRolls};
