use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};

use lsym_core::LsError;
use tracing::error;

/// Status returned by every fallible entry point (`ls_error_code` in C).
///
/// The C names are `LS_SUCCESS`, `LS_INVALID_ARGUMENT`, `LS_INVALID_HAMMING_WEIGHT`,
/// `LS_INVALID_NUMBER_SPINS`, `LS_INVALID_PERMUTATION`, `LS_INVALID_SECTOR`,
/// `LS_INVALID_STATE`, `LS_PERMUTATION_TOO_LONG`, `LS_INCOMPATIBLE_SYMMETRIES` and
/// `LS_SYSTEM_ERROR`, numbered from zero in that order.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LsErrorCode {
    /// No error.
    Success = 0,
    /// Null pointer or otherwise unusable argument.
    InvalidArgument,
    /// Reserved for bases with a fixed magnetisation.
    InvalidHammingWeight,
    /// Number of spins outside `1..=512`.
    InvalidNumberSpins,
    /// Permutation is not a bijection.
    InvalidPermutation,
    /// Sector outside `0..periodicity`, or invalid spin-inversion mode.
    InvalidSector,
    /// Configuration has bits above the last site.
    InvalidState,
    /// Permutation longer than 512 sites.
    PermutationTooLong,
    /// Generators imply contradictory phases.
    IncompatibleSymmetries,
    /// Invariant violation or internal failure.
    SystemError,
}

impl LsErrorCode {
    const ALL: [LsErrorCode; 10] = [
        LsErrorCode::Success,
        LsErrorCode::InvalidArgument,
        LsErrorCode::InvalidHammingWeight,
        LsErrorCode::InvalidNumberSpins,
        LsErrorCode::InvalidPermutation,
        LsErrorCode::InvalidSector,
        LsErrorCode::InvalidState,
        LsErrorCode::PermutationTooLong,
        LsErrorCode::IncompatibleSymmetries,
        LsErrorCode::SystemError,
    ];

    /// Decodes a raw status received from C.
    pub fn from_raw(code: c_int) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    /// Human readable description.
    pub fn message(self) -> &'static str {
        match self {
            LsErrorCode::Success => "no error",
            LsErrorCode::InvalidArgument => "invalid argument",
            LsErrorCode::InvalidHammingWeight => "invalid Hamming weight",
            LsErrorCode::InvalidNumberSpins => "invalid number of spins",
            LsErrorCode::InvalidPermutation => "argument is not a valid permutation",
            LsErrorCode::InvalidSector => "sector exceeds the periodicity of the operator",
            LsErrorCode::InvalidState => "invalid basis state",
            LsErrorCode::PermutationTooLong => "permutation is too long",
            LsErrorCode::IncompatibleSymmetries => "symmetries are incompatible",
            LsErrorCode::SystemError => "system error",
        }
    }
}

impl From<&LsError> for LsErrorCode {
    fn from(err: &LsError) -> Self {
        match err {
            LsError::IncompatibleSymmetries(_) => LsErrorCode::IncompatibleSymmetries,
            LsError::InvalidNumberOfSites(info) if info.code == "permutation-too-long" => {
                LsErrorCode::PermutationTooLong
            }
            LsError::InvalidNumberOfSites(_) => LsErrorCode::InvalidNumberSpins,
            LsError::InvalidPermutation(_) => LsErrorCode::InvalidPermutation,
            LsError::InvalidSector(_) => LsErrorCode::InvalidSector,
            LsError::InvalidState(_) => LsErrorCode::InvalidState,
            LsError::Serde(_) => LsErrorCode::InvalidArgument,
            LsError::System(_) => LsErrorCode::SystemError,
        }
    }
}

/// Failure of one ABI call.
#[derive(Debug)]
pub(crate) enum CallError {
    /// A required pointer argument was null.
    Null(&'static str),
    /// The library rejected the arguments.
    Library(LsError),
}

impl From<LsError> for CallError {
    fn from(err: LsError) -> Self {
        CallError::Library(err)
    }
}

/// Runs `body` at the ABI boundary: errors become status codes.
///
/// A panic is a violated invariant (negative stabilizer sum, mismatched network
/// depths) and aborts the process after logging; it never unwinds into C.
pub(crate) fn guard(body: impl FnOnce() -> Result<(), CallError>) -> LsErrorCode {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => LsErrorCode::Success,
        Ok(Err(CallError::Null(argument))) => {
            error!(argument, "null pointer argument");
            LsErrorCode::InvalidArgument
        }
        Ok(Err(CallError::Library(err))) => {
            error!(error = %err, "call failed");
            LsErrorCode::from(&err)
        }
        Err(_) => {
            error!("invariant violated inside a C ABI call; aborting");
            std::process::abort()
        }
    }
}

/// Returns a newly allocated description of `code`; free it with [`ls_destroy_string`].
#[no_mangle]
pub extern "C" fn ls_error_to_string(code: c_int) -> *mut c_char {
    let message = LsErrorCode::from_raw(code).map_or("unknown error code", LsErrorCode::message);
    CString::new(message).unwrap_or_default().into_raw()
}

/// Frees a string returned by [`ls_error_to_string`].
///
/// # Safety
///
/// `message` must be null or come from [`ls_error_to_string`] and not be freed twice.
#[no_mangle]
pub unsafe extern "C" fn ls_destroy_string(message: *mut c_char) {
    if !message.is_null() {
        drop(CString::from_raw(message));
    }
}
