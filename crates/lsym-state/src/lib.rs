#![deny(missing_docs)]
#![doc = "Canonical representative engine: for a fixed symmetry group, finds the minimal \
image of a spin configuration together with its character and norm, batching group \
elements over eight lanes and dispatching to the widest capability tier of the host."]

pub mod basis;
mod dispatch;
mod kernels;
pub mod tier;

pub use basis::{
    BasisBody, BasisHeader, BigBasisBody, SmallBasisBody, SpinBasis, SymmetryBatch, BATCH_SIZE,
};
pub use dispatch::{
    get_state_info_512, get_state_info_64, is_representative_512, is_representative_64,
};
pub use kernels::StateInfo;
pub use tier::{kernels, Kernels, Tier};
