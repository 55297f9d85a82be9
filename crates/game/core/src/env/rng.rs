//! Roll sources for turn resolution.
//!
//! # Determinism
//!
//! [`PcgRng`] produces the same sequence for the same seed, which makes whole
//! sessions reproducible. [`ScriptedRolls`] replays a fixed list of values and
//! exists for tests that need to force a particular branch.

/// Source of uniform rolls in `[0, 1)`.
pub trait RollSource: Send {
    /// Draw the next roll. Implementations must return a value in `[0, 1)`.
    fn next_roll(&mut self) -> f32;
}

impl<R: RollSource + ?Sized> RollSource for Box<R> {
    fn next_roll(&mut self) -> f32 {
        (**self).next_roll()
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 64-bit state, 32-bit output. The top 24 bits of each
/// output become the mantissa of the roll, so every roll is exactly
/// representable as `f32` and strictly below `1.0`.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Debug)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Scale from a 24-bit integer to `[0, 1)`.
    const UNIT: f32 = 1.0 / (1u32 << 24) as f32;

    /// Creates a stream seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        // Run the seed through one step so seed 0 does not start at state 0.
        Self {
            state: Self::pcg_step(seed.wrapping_add(Self::INCREMENT)),
        }
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generate the next raw 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}

impl RollSource for PcgRng {
    fn next_roll(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * Self::UNIT
    }
}

/// Replays a fixed list of rolls, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` on construction. An empty script behaves
/// like a constant `0.0` roll.
#[derive(Clone, Debug)]
pub struct ScriptedRolls {
    rolls: Vec<f32>,
    cursor: usize,
}

impl ScriptedRolls {
    /// Largest `f32` strictly below one.
    const MAX_ROLL: f32 = 1.0 - f32::EPSILON / 2.0;

    pub fn new(rolls: impl IntoIterator<Item = f32>) -> Self {
        let rolls = rolls
            .into_iter()
            .map(|roll| {
                if roll.is_nan() {
                    0.0
                } else {
                    roll.clamp(0.0, Self::MAX_ROLL)
                }
            })
            .collect();
        Self { rolls, cursor: 0 }
    }

    /// Always returns `roll`.
    pub fn constant(roll: f32) -> Self {
        Self::new([roll])
    }

    /// Number of rolls drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RollSource for ScriptedRolls {
    fn next_roll(&mut self) -> f32 {
        if self.rolls.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }
}
