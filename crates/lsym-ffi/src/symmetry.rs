use std::os::raw::{c_double, c_uint};

use lsym_core::{ErrorInfo, LsError, MAX_NUMBER_OF_SITES};
use lsym_group::Symmetry;

use crate::status::{guard, CallError, LsErrorCode};

/// Opaque symmetry handle (`ls_symmetry` in C).
#[repr(transparent)]
#[derive(Debug)]
pub struct LsSymmetry(pub(crate) Symmetry);

/// Boxes `value` into `*out` after checking for null.
pub(crate) unsafe fn write_out<T>(out: *mut *mut T, value: T) -> Result<(), CallError> {
    if out.is_null() {
        return Err(CallError::Null("out"));
    }
    *out = Box::into_raw(Box::new(value));
    Ok(())
}

/// Compiles a symmetry from `length` site indices and a sector.
///
/// # Safety
///
/// `out` must be writable and `permutation` must point to `length` readable entries.
#[no_mangle]
pub unsafe extern "C" fn ls_create_symmetry(
    out: *mut *mut LsSymmetry,
    length: c_uint,
    permutation: *const c_uint,
    sector: c_uint,
) -> LsErrorCode {
    guard(|| {
        let length = length as usize;
        if length > MAX_NUMBER_OF_SITES {
            return Err(LsError::InvalidNumberOfSites(
                ErrorInfo::new("permutation-too-long", "permutation acts on too many sites")
                    .with_context("length", length.to_string()),
            )
            .into());
        }
        if permutation.is_null() {
            return Err(CallError::Null("permutation"));
        }
        let raw = std::slice::from_raw_parts(permutation, length);
        let permutation = raw
            .iter()
            .map(|&site| {
                u16::try_from(site).map_err(|_| {
                    LsError::InvalidPermutation(
                        ErrorInfo::new("permutation-out-of-range", "site index out of range")
                            .with_context("value", site.to_string()),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let symmetry = Symmetry::new(permutation, sector)?;
        write_out(out, LsSymmetry(symmetry))
    })
}

/// Frees a symmetry created by [`ls_create_symmetry`].
///
/// # Safety
///
/// `symmetry` must be null or an owned handle that is not used afterwards.
#[no_mangle]
pub unsafe extern "C" fn ls_destroy_symmetry(symmetry: *mut LsSymmetry) {
    if !symmetry.is_null() {
        drop(Box::from_raw(symmetry));
    }
}

/// # Safety
///
/// `symmetry` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_get_sector(symmetry: *const LsSymmetry) -> c_uint {
    (*symmetry).0.sector()
}

/// # Safety
///
/// `symmetry` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_get_periodicity(symmetry: *const LsSymmetry) -> c_uint {
    (*symmetry).0.periodicity()
}

/// Phase `sector / periodicity` as a fraction of a full turn.
///
/// # Safety
///
/// `symmetry` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_get_phase(symmetry: *const LsSymmetry) -> c_double {
    (*symmetry).0.phase()
}

/// Writes the eigenvalue as `out[0] + i * out[1]`.
///
/// # Safety
///
/// `symmetry` must be a valid handle and `out` must have room for two doubles.
#[no_mangle]
pub unsafe extern "C" fn ls_get_eigenvalue(symmetry: *const LsSymmetry, out: *mut c_double) {
    let eigenvalue = (*symmetry).0.eigenvalue();
    *out = eigenvalue.re;
    *out.add(1) = eigenvalue.im;
}

/// # Safety
///
/// `symmetry` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_symmetry_get_number_spins(symmetry: *const LsSymmetry) -> c_uint {
    (*symmetry).0.number_of_sites() as c_uint
}

/// # Safety
///
/// `symmetry` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_symmetry_get_network_depth(symmetry: *const LsSymmetry) -> c_uint {
    (*symmetry).0.network_depth() as c_uint
}
