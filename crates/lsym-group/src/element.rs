use lsym_core::{compute_eigenvalue, Bits512, ErrorInfo, LsError, SMALL_NUMBER_OF_SITES};
use lsym_perm::{compute_periodicity, validate_permutation, BenesNetwork, BigNetwork, SmallNetwork};
use num_complex::Complex64;

use crate::spec::SymmetrySpec;

/// Capabilities shared by both element widths: a compiled network plus a phase.
///
/// Group-level operations (depth checks, dumps) are written against this trait.
pub trait CompiledSymmetry {
    /// Number of 64-bit words in one network mask.
    const WORDS_PER_MASK: usize;

    /// Number of network stages.
    fn network_depth(&self) -> usize;
    /// Number of sites acted upon.
    fn number_of_sites(&self) -> usize;
    /// Per-stage shifts.
    fn network_shifts(&self) -> &[u32];
    /// Writes the mask of `stage` into `out` (`WORDS_PER_MASK` words).
    fn write_mask(&self, stage: usize, out: &mut [u64]);
    /// Unit-modulus eigenvalue of the element.
    fn eigenvalue(&self) -> Complex64;
}

/// Element acting on at most 64 sites.
#[derive(Debug, Clone, PartialEq)]
pub struct SmallSymmetry {
    /// Compiled network with 64-bit masks.
    pub network: SmallNetwork,
    /// Eigenvalue `exp(2πi·sector/periodicity)`.
    pub eigenvalue: Complex64,
}

/// Element acting on more than 64 sites.
#[derive(Debug, Clone, PartialEq)]
pub struct BigSymmetry {
    /// Compiled network with 512-bit masks.
    pub network: BigNetwork,
    /// Eigenvalue `exp(2πi·sector/periodicity)`.
    pub eigenvalue: Complex64,
}

impl CompiledSymmetry for SmallSymmetry {
    const WORDS_PER_MASK: usize = 1;

    fn network_depth(&self) -> usize {
        self.network.depth()
    }

    fn number_of_sites(&self) -> usize {
        self.network.number_of_sites
    }

    fn network_shifts(&self) -> &[u32] {
        &self.network.shifts
    }

    fn write_mask(&self, stage: usize, out: &mut [u64]) {
        out[0] = self.network.masks[stage];
    }

    fn eigenvalue(&self) -> Complex64 {
        self.eigenvalue
    }
}

impl CompiledSymmetry for BigSymmetry {
    const WORDS_PER_MASK: usize = 8;

    fn network_depth(&self) -> usize {
        self.network.depth()
    }

    fn number_of_sites(&self) -> usize {
        self.network.number_of_sites
    }

    fn network_shifts(&self) -> &[u32] {
        &self.network.shifts
    }

    fn write_mask(&self, stage: usize, out: &mut [u64]) {
        out[..8].copy_from_slice(&self.network.masks[stage].words);
    }

    fn eigenvalue(&self) -> Complex64 {
        self.eigenvalue
    }
}

/// Width-specific payload, chosen by whether the element spans more than 64 sites.
#[derive(Debug, Clone, PartialEq)]
pub enum SymmetryPayload {
    /// Configurations fit into a `u64`.
    Small(SmallSymmetry),
    /// Configurations need a [`Bits512`].
    Big(BigSymmetry),
}

/// Immutable symmetry element: compiled permutation, quantised phase and eigenvalue.
#[derive(Debug, Clone, PartialEq)]
pub struct Symmetry {
    permutation: Vec<u16>,
    sector: u32,
    periodicity: u32,
    payload: SymmetryPayload,
}

impl Symmetry {
    /// Builds a generator from a permutation and a sector.
    ///
    /// The periodicity is the structural periodicity of `permutation`; `sector` must
    /// lie in `0..periodicity`.
    pub fn new(permutation: Vec<u16>, sector: u32) -> Result<Self, LsError> {
        validate_permutation(&permutation)?;
        let periodicity = compute_periodicity(&permutation);
        let periodicity = u32::try_from(periodicity).map_err(|_| {
            LsError::InvalidPermutation(
                ErrorInfo::new("periodicity-overflow", "permutation order does not fit 32 bits")
                    .with_context("periodicity", periodicity.to_string()),
            )
        })?;
        if sector >= periodicity {
            return Err(LsError::InvalidSector(
                ErrorInfo::new("sector-out-of-range", "sector must be below the periodicity")
                    .with_context("sector", sector.to_string())
                    .with_context("periodicity", periodicity.to_string())
                    .with_hint("sectors are taken modulo the order of the permutation"),
            ));
        }
        Self::from_spec(&SymmetrySpec {
            permutation,
            sector,
            periodicity,
        })
    }

    /// Compiles a specification. Fails only on malformed permutations.
    pub fn from_spec(spec: &SymmetrySpec) -> Result<Self, LsError> {
        if spec.periodicity == 0 {
            return Err(LsError::InvalidSector(ErrorInfo::new(
                "periodicity-zero",
                "periodicity must be positive",
            )));
        }
        let network = BenesNetwork::compile(&spec.permutation)?;
        let eigenvalue = compute_eigenvalue(spec.sector, spec.periodicity);
        let payload = if spec.permutation.len() > SMALL_NUMBER_OF_SITES {
            SymmetryPayload::Big(BigSymmetry {
                network: network.to_big(),
                eigenvalue,
            })
        } else {
            SymmetryPayload::Small(SmallSymmetry {
                network: network.to_small()?,
                eigenvalue,
            })
        };
        Ok(Self {
            permutation: spec.permutation.clone(),
            sector: spec.sector,
            periodicity: spec.periodicity,
            payload,
        })
    }

    /// Specification this element was compiled from.
    pub fn to_spec(&self) -> SymmetrySpec {
        SymmetrySpec {
            permutation: self.permutation.clone(),
            sector: self.sector,
            periodicity: self.periodicity,
        }
    }

    /// Site mapping.
    pub fn permutation(&self) -> &[u16] {
        &self.permutation
    }

    /// Phase numerator.
    pub fn sector(&self) -> u32 {
        self.sector
    }

    /// Phase denominator.
    pub fn periodicity(&self) -> u32 {
        self.periodicity
    }

    /// Phase as a fraction of a full turn.
    pub fn phase(&self) -> f64 {
        f64::from(self.sector) / f64::from(self.periodicity)
    }

    /// Width-specific payload.
    pub fn payload(&self) -> &SymmetryPayload {
        &self.payload
    }

    /// Eigenvalue `exp(2πi·sector/periodicity)`.
    pub fn eigenvalue(&self) -> Complex64 {
        match &self.payload {
            SymmetryPayload::Small(s) => s.eigenvalue,
            SymmetryPayload::Big(s) => s.eigenvalue,
        }
    }

    /// Number of sites acted upon.
    pub fn number_of_sites(&self) -> usize {
        self.permutation.len()
    }

    /// Number of network stages.
    pub fn network_depth(&self) -> usize {
        match &self.payload {
            SymmetryPayload::Small(s) => s.network_depth(),
            SymmetryPayload::Big(s) => s.network_depth(),
        }
    }

    /// Applies the element to a configuration on at most 64 sites.
    ///
    /// Returns `None` for elements that need the wide representation.
    pub fn apply_64(&self, bits: u64) -> Option<u64> {
        match &self.payload {
            SymmetryPayload::Small(s) => Some(s.network.apply(bits)),
            SymmetryPayload::Big(_) => None,
        }
    }

    /// Applies the element to a wide configuration (either width).
    pub fn apply_512(&self, bits: &Bits512) -> Bits512 {
        match &self.payload {
            SymmetryPayload::Small(s) => Bits512::from_u64(s.network.apply(bits.words[0])),
            SymmetryPayload::Big(s) => s.network.apply(bits),
        }
    }
}
