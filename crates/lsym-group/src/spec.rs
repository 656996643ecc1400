use lsym_core::{ErrorInfo, LsError, Phase};
use lsym_perm::{compute_periodicity, identity_permutation};
use serde::{Deserialize, Serialize};

/// A permutation together with the phase `sector / periodicity` of its eigenvalue.
///
/// `permutation[i]` is the site that site `i` is moved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetrySpec {
    /// Site mapping, one entry per lattice site.
    pub permutation: Vec<u16>,
    /// Phase numerator.
    pub sector: u32,
    /// Phase denominator.
    pub periodicity: u32,
}

impl SymmetrySpec {
    /// The identity on `number_of_sites` sites with phase `0/1`.
    pub fn identity(number_of_sites: usize) -> Self {
        Self {
            permutation: identity_permutation(number_of_sites),
            sector: 0,
            periodicity: 1,
        }
    }

    /// Number of sites the permutation acts on.
    pub fn number_of_sites(&self) -> usize {
        self.permutation.len()
    }

    fn phase(&self) -> Result<Phase, LsError> {
        Phase::new(self.sector, self.periodicity)
    }
}

fn length_mismatch(x: &SymmetrySpec, y: &SymmetrySpec) -> LsError {
    LsError::IncompatibleSymmetries(
        ErrorInfo::new(
            "symmetry-length-mismatch",
            "symmetries act on different numbers of sites",
        )
        .with_context("left", x.number_of_sites().to_string())
        .with_context("right", y.number_of_sites().to_string()),
    )
}

/// Equality of two specifications.
///
/// Identical permutations with different sectors at the same periodicity describe the
/// same operator with two phases, which is reported as an error rather than as "not
/// equal".
pub fn specs_equal(x: &SymmetrySpec, y: &SymmetrySpec) -> Result<bool, LsError> {
    if x.number_of_sites() != y.number_of_sites() {
        return Err(length_mismatch(x, y));
    }
    if x.periodicity != y.periodicity {
        return Ok(false);
    }
    if x.permutation != y.permutation {
        return Ok(false);
    }
    if x.sector != y.sector {
        return Err(LsError::IncompatibleSymmetries(
            ErrorInfo::new(
                "symmetry-contradictory-sector",
                "the same permutation carries two different phases",
            )
            .with_context("periodicity", x.periodicity.to_string())
            .with_context("left", x.sector.to_string())
            .with_context("right", y.sector.to_string()),
        ));
    }
    Ok(true)
}

/// Composes `x` after `y`: `combined[i] = x.permutation[y.permutation[i]]`.
///
/// Phases add modulo one. The sum is then requantised to the structural periodicity
/// of the combined permutation, which must be a multiple of its denominator.
pub fn compose(x: &SymmetrySpec, y: &SymmetrySpec) -> Result<SymmetrySpec, LsError> {
    if x.number_of_sites() != y.number_of_sites() {
        return Err(length_mismatch(x, y));
    }
    let permutation: Vec<u16> = y
        .permutation
        .iter()
        .map(|&i| x.permutation[usize::from(i)])
        .collect();
    let periodicity = compute_periodicity(&permutation);
    let phase = x.phase()?.add(y.phase()?)?;
    let denominator = u64::from(phase.denominator());
    if denominator > periodicity || periodicity % denominator != 0 {
        return Err(LsError::IncompatibleSymmetries(
            ErrorInfo::new(
                "compose-unrealisable-phase",
                "phase cannot be realised at the periodicity of the composed permutation",
            )
            .with_context("phase", phase.to_string())
            .with_context("periodicity", periodicity.to_string()),
        ));
    }
    let periodicity = u32::try_from(periodicity).map_err(|_| {
        LsError::IncompatibleSymmetries(
            ErrorInfo::new("compose-periodicity-overflow", "periodicity does not fit 32 bits")
                .with_context("periodicity", periodicity.to_string()),
        )
    })?;
    let sector = phase.numerator() * (periodicity / phase.denominator());
    Ok(SymmetrySpec {
        permutation,
        sector,
        periodicity,
    })
}
