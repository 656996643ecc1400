use std::os::raw::{c_double, c_int};

use lsym_core::{Bits512, ErrorInfo, LsError};
use lsym_state::{
    get_state_info_512, get_state_info_64, is_representative_64, BasisBody, SpinBasis, StateInfo,
};

use crate::group::LsGroup;
use crate::status::{guard, CallError, LsErrorCode};
use crate::symmetry::write_out;

const _: () = assert!(std::mem::size_of::<Bits512>() == 64);

/// Opaque basis handle (`ls_spin_basis` in C): a group laid out for the engine.
#[derive(Debug)]
pub struct LsSpinBasis(pub(crate) SpinBasis);

/// Lays out `group` for representative queries with the given spin-inversion mode
/// (`0`, `1` or `-1`).
///
/// # Safety
///
/// `out` must be writable and `group` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_create_spin_basis(
    out: *mut *mut LsSpinBasis,
    group: *const LsGroup,
    spin_inversion: c_int,
) -> LsErrorCode {
    guard(|| {
        if group.is_null() {
            return Err(CallError::Null("group"));
        }
        let basis = SpinBasis::new(&(*group).0, spin_inversion)?;
        write_out(out, LsSpinBasis(basis))
    })
}

/// Frees a basis.
///
/// # Safety
///
/// `basis` must be null or an owned handle that is not used afterwards.
#[no_mangle]
pub unsafe extern "C" fn ls_destroy_spin_basis(basis: *mut LsSpinBasis) {
    if !basis.is_null() {
        drop(Box::from_raw(basis));
    }
}

unsafe fn write_info<B: Copy>(
    info: StateInfo<B>,
    representative: *mut B,
    character: *mut c_double,
    norm: *mut c_double,
) -> Result<(), CallError> {
    if representative.is_null() || character.is_null() || norm.is_null() {
        return Err(CallError::Null("representative, character or norm"));
    }
    *representative = info.representative;
    *character = info.character.re;
    *character.add(1) = info.character.im;
    *norm = info.norm;
    Ok(())
}

fn not_narrow() -> LsError {
    LsError::InvalidState(
        ErrorInfo::new("state-too-wide", "basis spans more than 64 spins")
            .with_hint("use ls_get_state_info_512"),
    )
}

/// Representative, character (`character[0] + i * character[1]`) and norm of `bits`.
///
/// # Safety
///
/// `basis` must be a valid handle; the output pointers must be writable.
#[no_mangle]
pub unsafe extern "C" fn ls_get_state_info_64(
    basis: *const LsSpinBasis,
    bits: u64,
    representative: *mut u64,
    character: *mut c_double,
    norm: *mut c_double,
) -> LsErrorCode {
    guard(|| {
        let basis = &(*basis).0;
        let BasisBody::Small(body) = &basis.body else {
            return Err(not_narrow().into());
        };
        basis.header.check_state_64(bits)?;
        let info = get_state_info_64(&basis.header, body, bits);
        write_info(info, representative, character, norm)
    })
}

/// Whether `bits` is a representative with non-zero norm. Returns false for bases on
/// more than 64 spins and for configurations with bits above the last spin.
///
/// # Safety
///
/// `basis` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn ls_is_representative_64(basis: *const LsSpinBasis, bits: u64) -> bool {
    let basis = &(*basis).0;
    match &basis.body {
        BasisBody::Small(body) if basis.header.check_state_64(bits).is_ok() => {
            is_representative_64(&basis.header, body, bits)
        }
        _ => false,
    }
}

/// Wide counterpart of [`ls_get_state_info_64`]; works for bases of any size.
///
/// # Safety
///
/// `basis` must be a valid handle; `bits` must be readable and the output pointers
/// writable.
#[no_mangle]
pub unsafe extern "C" fn ls_get_state_info_512(
    basis: *const LsSpinBasis,
    bits: *const Bits512,
    representative: *mut Bits512,
    character: *mut c_double,
    norm: *mut c_double,
) -> LsErrorCode {
    guard(|| {
        if bits.is_null() {
            return Err(CallError::Null("bits"));
        }
        let basis = &(*basis).0;
        let bits = &*bits;
        basis.header.check_state_512(bits)?;
        let info = match &basis.body {
            BasisBody::Big(body) => get_state_info_512(&basis.header, body, bits),
            BasisBody::Small(body) => {
                let narrow = get_state_info_64(&basis.header, body, bits.words[0]);
                StateInfo {
                    representative: Bits512::from_u64(narrow.representative),
                    character: narrow.character,
                    norm: narrow.norm,
                }
            }
        };
        write_info(info, representative, character, norm)
    })
}
