//! PCG32 pseudorandom number generator (PCG-XSH-RR) and the
//! `RandomSource` seam every sampling routine draws through.
//!
//! A batch gives trial `i` its own stream `Pcg32::new(seed, i)`, so
//! results do not depend on how trials are scheduled across threads.

const MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_float(&mut self) -> f64;

    /// Uniform float in `[0, max)`.
    fn next_below(&mut self, max: f64) -> f64 {
        self.next_float() * max
    }
}

#[derive(Debug, Clone)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Pcg32 {
    /// Stream `seq` of generator `seed`. Different `seq` values give
    /// statistically independent streams for the same seed.
    pub fn new(seed: u64, seq: u64) -> Self {
        let inc = (seq << 1) | 1;
        let mut rng = Pcg32 { state: 0, inc };
        rng.advance();
        rng.state = rng.state.wrapping_add(seed);
        rng.advance();
        rng
    }

    /// Stream dedicated to one trial of a batch.
    pub fn for_trial(seed: u64, trial: usize) -> Self {
        Self::new(seed, trial as u64)
    }

    fn advance(&mut self) {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(self.inc);
    }

    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.advance();
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        (xorshifted >> rot) | (xorshifted << (rot.wrapping_neg() & 31))
    }
}

impl RandomSource for Pcg32 {
    fn next_float(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}
