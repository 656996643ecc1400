//! Capability tiers and the registry of kernels compiled for each of them.
//!
//! All tiers are interchangeable: they run the same code under different target
//! features and return identical results. Callers pick one through [`Tier::detect`]
//! or iterate [`Tier::available`]; nothing outside this module special-cases a tier.

use std::fmt::{self, Display};
use std::sync::OnceLock;

use lsym_core::Bits512;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::basis::{BasisHeader, BigBasisBody, SmallBasisBody};
use crate::kernels::{self, StateInfo};

/// Hardware capability level a kernel set is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Baseline 128-bit vectors.
    Sse2,
    /// 256-bit floating point vectors.
    Avx,
    /// 256-bit integer and floating point vectors.
    Avx2,
}

impl Tier {
    /// Every tier, narrowest first.
    pub const ALL: [Tier; 3] = [Tier::Sse2, Tier::Avx, Tier::Avx2];

    /// Lowercase name, as used in logs and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Tier::Sse2 => "sse2",
            Tier::Avx => "avx",
            Tier::Avx2 => "avx2",
        }
    }

    /// Whether the running processor supports this tier.
    #[cfg(target_arch = "x86_64")]
    pub fn is_supported(self) -> bool {
        match self {
            Tier::Sse2 => is_x86_feature_detected!("sse2"),
            Tier::Avx => is_x86_feature_detected!("avx"),
            Tier::Avx2 => is_x86_feature_detected!("avx2"),
        }
    }

    /// Whether the running processor supports this tier.
    ///
    /// Other architectures run the portable kernels under every tier name.
    #[cfg(not(target_arch = "x86_64"))]
    pub fn is_supported(self) -> bool {
        true
    }

    /// Supported tiers, narrowest first.
    pub fn available() -> Vec<Tier> {
        Tier::ALL.into_iter().filter(|t| t.is_supported()).collect()
    }

    /// Widest supported tier. Probed once per process.
    pub fn detect() -> Tier {
        static DETECTED: OnceLock<Tier> = OnceLock::new();
        *DETECTED.get_or_init(|| {
            let tier = Tier::ALL
                .into_iter()
                .rev()
                .find(|t| t.is_supported())
                .unwrap_or(Tier::Sse2);
            debug!(tier = tier.name(), "selected capability tier");
            tier
        })
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine entry points of one tier.
pub struct Kernels {
    /// Tier these kernels were compiled for.
    pub tier: Tier,
    /// Full form on narrow configurations.
    pub state_info_64: fn(&BasisHeader, &SmallBasisBody, u64) -> StateInfo<u64>,
    /// Cheap form on narrow configurations.
    pub is_representative_64: fn(&BasisHeader, &SmallBasisBody, u64) -> bool,
    /// Full form on wide configurations.
    pub state_info_512: fn(&BasisHeader, &BigBasisBody, &Bits512) -> StateInfo<Bits512>,
    /// Cheap form on wide configurations.
    pub is_representative_512: fn(&BasisHeader, &BigBasisBody, &Bits512) -> bool,
}

impl fmt::Debug for Kernels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernels").field("tier", &self.tier).finish_non_exhaustive()
    }
}

#[cfg(target_arch = "x86_64")]
macro_rules! tier_kernels {
    ($module:ident, $tier:expr, $features:literal) => {
        mod $module {
            use super::*;

            #[target_feature(enable = $features)]
            unsafe fn state_info_64_impl(
                header: &BasisHeader,
                body: &SmallBasisBody,
                bits: u64,
            ) -> StateInfo<u64> {
                kernels::state_info_64(header, body, bits)
            }

            #[target_feature(enable = $features)]
            unsafe fn is_representative_64_impl(
                header: &BasisHeader,
                body: &SmallBasisBody,
                bits: u64,
            ) -> bool {
                kernels::is_representative_64(header, body, bits)
            }

            #[target_feature(enable = $features)]
            unsafe fn state_info_512_impl(
                header: &BasisHeader,
                body: &BigBasisBody,
                bits: &Bits512,
            ) -> StateInfo<Bits512> {
                kernels::state_info_512(header, body, bits)
            }

            #[target_feature(enable = $features)]
            unsafe fn is_representative_512_impl(
                header: &BasisHeader,
                body: &BigBasisBody,
                bits: &Bits512,
            ) -> bool {
                kernels::is_representative_512(header, body, bits)
            }

            // SAFETY (all four): `KERNELS` is only reachable through `registry`, which is
            // only called with tiers whose features were detected at runtime.
            fn state_info_64(header: &BasisHeader, body: &SmallBasisBody, bits: u64) -> StateInfo<u64> {
                unsafe { state_info_64_impl(header, body, bits) }
            }

            fn is_representative_64(header: &BasisHeader, body: &SmallBasisBody, bits: u64) -> bool {
                unsafe { is_representative_64_impl(header, body, bits) }
            }

            fn state_info_512(
                header: &BasisHeader,
                body: &BigBasisBody,
                bits: &Bits512,
            ) -> StateInfo<Bits512> {
                unsafe { state_info_512_impl(header, body, bits) }
            }

            fn is_representative_512(
                header: &BasisHeader,
                body: &BigBasisBody,
                bits: &Bits512,
            ) -> bool {
                unsafe { is_representative_512_impl(header, body, bits) }
            }

            pub(super) static KERNELS: Kernels = Kernels {
                tier: $tier,
                state_info_64,
                is_representative_64,
                state_info_512,
                is_representative_512,
            };
        }
    };
}

#[cfg(target_arch = "x86_64")]
tier_kernels!(sse2, Tier::Sse2, "sse2");
#[cfg(target_arch = "x86_64")]
tier_kernels!(avx, Tier::Avx, "avx");
#[cfg(target_arch = "x86_64")]
tier_kernels!(avx2, Tier::Avx2, "avx2");

#[cfg(not(target_arch = "x86_64"))]
mod portable {
    use super::*;

    fn state_info_64(header: &BasisHeader, body: &SmallBasisBody, bits: u64) -> StateInfo<u64> {
        kernels::state_info_64(header, body, bits)
    }

    fn is_representative_64(header: &BasisHeader, body: &SmallBasisBody, bits: u64) -> bool {
        kernels::is_representative_64(header, body, bits)
    }

    fn state_info_512(
        header: &BasisHeader,
        body: &BigBasisBody,
        bits: &Bits512,
    ) -> StateInfo<Bits512> {
        kernels::state_info_512(header, body, bits)
    }

    fn is_representative_512(header: &BasisHeader, body: &BigBasisBody, bits: &Bits512) -> bool {
        kernels::is_representative_512(header, body, bits)
    }

    macro_rules! portable_kernels {
        ($name:ident, $tier:expr) => {
            pub(in crate::tier) static $name: Kernels = Kernels {
                tier: $tier,
                state_info_64,
                is_representative_64,
                state_info_512,
                is_representative_512,
            };
        };
    }

    portable_kernels!(SSE2, Tier::Sse2);
    portable_kernels!(AVX, Tier::Avx);
    portable_kernels!(AVX2, Tier::Avx2);
}

/// Kernels of `tier` without checking support.
#[cfg(target_arch = "x86_64")]
pub(crate) fn registry(tier: Tier) -> &'static Kernels {
    match tier {
        Tier::Sse2 => &sse2::KERNELS,
        Tier::Avx => &avx::KERNELS,
        Tier::Avx2 => &avx2::KERNELS,
    }
}

/// Kernels of `tier` without checking support.
#[cfg(not(target_arch = "x86_64"))]
pub(crate) fn registry(tier: Tier) -> &'static Kernels {
    match tier {
        Tier::Sse2 => &portable::SSE2,
        Tier::Avx => &portable::AVX,
        Tier::Avx2 => &portable::AVX2,
    }
}

/// Kernels compiled for `tier`, or `None` when the processor lacks its features.
pub fn kernels(tier: Tier) -> Option<&'static Kernels> {
    tier.is_supported().then(|| registry(tier))
}
