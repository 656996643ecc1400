use std::os::raw::{c_double, c_int, c_uint};

use lsym_core::{ErrorInfo, LsError};
use lsym_group::{Group, Symmetry};
use num_complex::Complex64;

use crate::status::{guard, CallError, LsErrorCode};
use crate::symmetry::{write_out, LsSymmetry};

const _: () = assert!(std::mem::size_of::<Complex64>() == 2 * std::mem::size_of::<c_double>());

/// Opaque group handle (`ls_group` in C).
#[repr(transparent)]
#[derive(Debug)]
pub struct LsGroup(pub(crate) Group);

/// Closes `size` generators into a group. `size == 0` yields an empty group.
///
/// # Safety
///
/// `out` must be writable and `generators` must point to `size` valid handles.
#[no_mangle]
pub unsafe extern "C" fn ls_create_group(
    out: *mut *mut LsGroup,
    size: c_uint,
    generators: *const *const LsSymmetry,
) -> LsErrorCode {
    guard(|| {
        let generators: Vec<Symmetry> = if size == 0 {
            Vec::new()
        } else {
            if generators.is_null() {
                return Err(CallError::Null("generators"));
            }
            let handles = std::slice::from_raw_parts(generators, size as usize);
            if handles.iter().any(|h| h.is_null()) {
                return Err(CallError::Null("generators[i]"));
            }
            handles.iter().map(|&h| (*h).0.clone()).collect()
        };
        let group = Group::new(&generators)?;
        write_out(out, LsGroup(group))
    })
}

/// Group containing only the identity on `number_spins` sites.
///
/// # Safety
///
/// `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn ls_create_trivial_group(
    out: *mut *mut LsGroup,
    number_spins: c_uint,
) -> LsErrorCode {
    guard(|| {
        let group = Group::trivial(number_spins as usize)?;
        write_out(out, LsGroup(group))
    })
}

/// Frees a group.
///
/// # Safety
///
/// `group` must be null or an owned handle that is not used afterwards.
#[no_mangle]
pub unsafe extern "C" fn ls_destroy_group(group: *mut LsGroup) {
    if !group.is_null() {
        drop(Box::from_raw(group));
    }
}

/// # Safety
///
/// `group` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_get_group_size(group: *const LsGroup) -> c_uint {
    (*group).0.len() as c_uint
}

/// Number of spins, or `-1` for an empty group.
///
/// # Safety
///
/// `group` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_group_get_number_spins(group: *const LsGroup) -> c_int {
    (*group).0.number_of_sites().map_or(-1, |n| n as c_int)
}

/// Common network depth, or `-1` for an empty group.
///
/// # Safety
///
/// `group` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_group_get_network_depth(group: *const LsGroup) -> c_int {
    (*group).0.network_depth().map_or(-1, |d| d as c_int)
}

/// Copies masks, shifts and eigenvalues of every element.
///
/// `masks` receives `depth * size` masks in row-major `[depth][size]` order, each one
/// word for groups on at most 64 spins and eight words otherwise. `shifts` receives
/// `depth` entries, `eigenvalues` receives `size` pairs of doubles.
///
/// # Safety
///
/// `group` must be a valid handle and the buffers must have the sizes above.
#[no_mangle]
pub unsafe extern "C" fn ls_group_dump_symmetry_info(
    group: *const LsGroup,
    masks: *mut u64,
    shifts: *mut c_uint,
    eigenvalues: *mut c_double,
) -> LsErrorCode {
    guard(|| {
        let group = &(*group).0;
        let depth = group.network_depth().ok_or_else(|| {
            LsError::System(ErrorInfo::new("group-empty", "group has no elements"))
        })?;
        if masks.is_null() || shifts.is_null() || eigenvalues.is_null() {
            return Err(CallError::Null("masks, shifts or eigenvalues"));
        }
        let size = group.len();
        let masks = std::slice::from_raw_parts_mut(masks, depth * size * group.words_per_mask());
        let shifts = std::slice::from_raw_parts_mut(shifts as *mut u32, depth);
        let eigenvalues = std::slice::from_raw_parts_mut(eigenvalues as *mut Complex64, size);
        group.dump_into(masks, shifts, eigenvalues)?;
        Ok(())
    })
}

/// Elements of the group as a contiguous array of `ls_get_group_size` handles.
///
/// The array is owned by the group and lives as long as it does.
///
/// # Safety
///
/// `group` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_group_get_symmetries(group: *const LsGroup) -> *const LsSymmetry {
    (*group).0.symmetries().as_ptr() as *const LsSymmetry
}
