// HealthBand - Heart-Rate Source
//
// The engine owns the refresh cadence and the presence reset; a source only
// has to hand out the next value when asked. `PlaceholderHeartRate` draws
// uniformly from the resting range until a real estimator replaces it.

use rand::Rng;

use crate::config::{BPM_MAX, BPM_MIN};

pub trait HeartRateSource {
    /// Next heart-rate value in BPM. Must stay within a bounded range.
    fn next_bpm(&mut self) -> u16;
}

/// Uniform draw from `BPM_MIN..=BPM_MAX`.
pub struct PlaceholderHeartRate<R> {
    rng: R,
}

impl<R: Rng> PlaceholderHeartRate<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> HeartRateSource for PlaceholderHeartRate<R> {
    fn next_bpm(&mut self) -> u16 {
        self.rng.gen_range(BPM_MIN..=BPM_MAX)
    }
}
