#![deny(missing_docs)]
#![doc = "Core types shared by the lattice symmetry crates: errors, rational phases, \
wide spin configurations and the deterministic RNG used by tests and tools."]

pub mod bits;
pub mod errors;
pub mod phase;
pub mod rng;

pub use bits::{flip_mask_512, flip_mask_64, Bits512};
pub use errors::{ErrorInfo, LsError};
pub use phase::{compute_eigenvalue, gcd, Phase};
pub use rng::RngHandle;

/// Largest number of sites a configuration may span (the width of [`Bits512`]).
pub const MAX_NUMBER_OF_SITES: usize = 512;

/// Number of sites that still fit into a single machine word.
pub const SMALL_NUMBER_OF_SITES: usize = 64;

/// Returns whether configurations on `number_of_sites` sites need the wide representation.
pub fn is_wide(number_of_sites: usize) -> bool {
    number_of_sites > SMALL_NUMBER_OF_SITES
}
