//! Roll sources that live outside the deterministic core.

use game_core::RollSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Entropy-seeded rolls for interactive sessions.
///
/// Sessions driven by this source cannot be replayed; configure a seed to get
/// a [`game_core::PcgRng`] instead.
#[derive(Debug, Clone)]
pub struct EntropyRolls {
    rng: StdRng,
}

impl EntropyRolls {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for EntropyRolls {
    fn default() -> Self {
        Self::new()
    }
}

impl RollSource for EntropyRolls {
    fn next_roll(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }
}
