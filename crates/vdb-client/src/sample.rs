//! Sampling gate for geometry commands

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct SampleGate {
    enabled: bool,
    rng: StdRng,
}

impl SampleGate {
    /// Enabled gate; seeded draws are reproducible
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { enabled: true, rng }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable unconditionally at `probability >= 1`, otherwise enable iff a
    /// uniform draw in `[0, 1)` falls below `probability`.
    pub fn set_sample(&mut self, probability: f32) -> bool {
        self.enabled = if probability >= 1.0 {
            true
        } else {
            self.rng.gen::<f32>() < probability
        };
        self.enabled
    }
}

impl Default for SampleGate {
    fn default() -> Self {
        Self::new(None)
    }
}
