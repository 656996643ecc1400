#![deny(missing_docs)]
#![doc = "Permutation adapter for lattice symmetries: validation, structural periodicity \
and compilation of permutations into Benes networks applicable to 64-bit and 512-bit \
spin configurations."]

mod network;
mod permutation;

pub use network::{BenesNetwork, BigNetwork, SmallNetwork};
pub use permutation::{compute_periodicity, identity_permutation, validate_permutation};
