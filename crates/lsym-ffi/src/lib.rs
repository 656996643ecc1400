//! C ABI for lattice symmetry groups.
//!
//! Handles are opaque boxed pointers created by `ls_create_*` and released by the
//! matching `ls_destroy_*`. Fallible calls return an [`LsErrorCode`]; errors and
//! panics never cross the boundary.

mod basis;
mod group;
mod status;
mod symmetry;

pub use basis::{
    ls_create_spin_basis, ls_destroy_spin_basis, ls_get_state_info_512, ls_get_state_info_64,
    ls_is_representative_64, LsSpinBasis,
};
pub use group::{
    ls_create_group, ls_create_trivial_group, ls_destroy_group, ls_get_group_size,
    ls_group_dump_symmetry_info, ls_group_get_network_depth, ls_group_get_number_spins,
    ls_group_get_symmetries, LsGroup,
};
pub use status::{ls_destroy_string, ls_error_to_string, LsErrorCode};
pub use symmetry::{
    ls_create_symmetry, ls_destroy_symmetry, ls_get_eigenvalue, ls_get_periodicity,
    ls_get_phase, ls_get_sector, ls_symmetry_get_network_depth, ls_symmetry_get_number_spins,
    LsSymmetry,
};
