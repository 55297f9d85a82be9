//! Mutable participants of a duel.
//!
//! Runtime layers hold combatants behind their own synchronization, but every
//! HP or failure-stack change goes through the bounded mutators defined here.
mod combatant;

pub use combatant::Combatant;
