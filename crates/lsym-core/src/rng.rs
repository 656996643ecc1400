//! Deterministic RNG wrapper used to draw spin configurations.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::bits::{flip_mask_512, flip_mask_64, Bits512};

/// Deterministic RNG handle used to draw spin configurations.
///
/// The handle is a thin wrapper around `StdRng`. A `seed: u64` must be provided by
/// the caller, so sampled configurations are reproducible across runs.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a mutable reference to the underlying RNG for advanced usage.
    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Draws a uniformly random configuration on `number_of_sites <= 64` sites.
    pub fn configuration_64(&mut self, number_of_sites: usize) -> u64 {
        self.rng.next_u64() & flip_mask_64(number_of_sites)
    }

    /// Draws a uniformly random configuration on `number_of_sites <= 512` sites.
    pub fn configuration_512(&mut self, number_of_sites: usize) -> Bits512 {
        let mut bits = Bits512::ZERO;
        for word in bits.words.iter_mut() {
            *word = self.rng.next_u64();
        }
        bits & flip_mask_512(number_of_sites)
    }
}
