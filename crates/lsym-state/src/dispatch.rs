use lsym_core::Bits512;

use crate::basis::{BasisHeader, BigBasisBody, SmallBasisBody};
use crate::kernels::StateInfo;
use crate::tier::{registry, Tier};

/// Representative, character and norm of a configuration on at most 64 sites.
///
/// Runs on the widest supported tier. Bits above `number_of_sites` must be clear.
pub fn get_state_info_64(header: &BasisHeader, body: &SmallBasisBody, bits: u64) -> StateInfo<u64> {
    (registry(Tier::detect()).state_info_64)(header, body, bits)
}

/// Whether `bits` is the representative of its orbit and survives the projection.
pub fn is_representative_64(header: &BasisHeader, body: &SmallBasisBody, bits: u64) -> bool {
    (registry(Tier::detect()).is_representative_64)(header, body, bits)
}

/// Wide counterpart of [`get_state_info_64`]; elements are processed one at a time.
pub fn get_state_info_512(
    header: &BasisHeader,
    body: &BigBasisBody,
    bits: &Bits512,
) -> StateInfo<Bits512> {
    (registry(Tier::detect()).state_info_512)(header, body, bits)
}

/// Wide counterpart of [`is_representative_64`].
pub fn is_representative_512(header: &BasisHeader, body: &BigBasisBody, bits: &Bits512) -> bool {
    (registry(Tier::detect()).is_representative_512)(header, body, bits)
}
