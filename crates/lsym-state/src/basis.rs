//! Group data laid out for the representative engine.
//!
//! Narrow configurations (at most 64 sites) use [`SmallBasisBody`]: group elements are
//! packed into batches of [`BATCH_SIZE`] lanes with masks stored per stage and lane,
//! plus a partial batch for the remainder. Wide configurations use [`BigBasisBody`],
//! a plain ordered list of elements.

use lsym_core::{flip_mask_64, is_wide, Bits512, ErrorInfo, LsError};
use lsym_group::{BigSymmetry, Group, SymmetryPayload};
use lsym_perm::BigNetwork;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of group elements processed together.
pub const BATCH_SIZE: usize = 8;

/// Parameters shared by every engine call for one basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisHeader {
    /// Number of lattice sites.
    pub number_of_sites: usize,
    /// When false the engine returns every configuration unchanged.
    pub has_symmetries: bool,
    /// `0` when spin inversion is absent, `1` for a trivial phase, `-1` otherwise.
    pub spin_inversion: i32,
}

impl BasisHeader {
    /// Header for `group` combined with the given spin-inversion mode.
    pub fn for_group(group: &Group, spin_inversion: i32) -> Result<Self, LsError> {
        check_spin_inversion(spin_inversion)?;
        let number_of_sites = group.number_of_sites().ok_or_else(|| {
            LsError::InvalidNumberOfSites(ErrorInfo::new(
                "basis-empty-group",
                "a basis needs a group with at least one element",
            ))
        })?;
        Ok(Self {
            number_of_sites,
            has_symmetries: true,
            spin_inversion,
        })
    }

    /// Checks that a narrow configuration has no bits above `number_of_sites`.
    pub fn check_state_64(&self, bits: u64) -> Result<(), LsError> {
        if is_wide(self.number_of_sites) || bits & !flip_mask_64(self.number_of_sites) != 0 {
            return Err(invalid_state(self.number_of_sites, bits.to_string()));
        }
        Ok(())
    }

    /// Checks that a wide configuration has no bits above `number_of_sites`.
    pub fn check_state_512(&self, bits: &Bits512) -> Result<(), LsError> {
        if bits.significant_bits() > self.number_of_sites {
            return Err(invalid_state(self.number_of_sites, bits.to_string()));
        }
        Ok(())
    }
}

fn invalid_state(number_of_sites: usize, bits: String) -> LsError {
    LsError::InvalidState(
        ErrorInfo::new("state-out-of-range", "configuration has bits above the last site")
            .with_context("number_of_sites", number_of_sites.to_string())
            .with_context("state", bits),
    )
}

fn check_spin_inversion(spin_inversion: i32) -> Result<(), LsError> {
    if !matches!(spin_inversion, -1..=1) {
        return Err(LsError::InvalidSector(
            ErrorInfo::new("spin-inversion-out-of-range", "spin inversion must be 0, 1 or -1")
                .with_context("spin_inversion", spin_inversion.to_string()),
        ));
    }
    Ok(())
}

/// Up to [`BATCH_SIZE`] narrow elements sharing one network layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryBatch {
    /// `masks[stage][lane]`.
    pub masks: Vec<[u64; BATCH_SIZE]>,
    /// Per-stage shifts, common to all lanes.
    pub shifts: Vec<u32>,
    /// Real parts of the lane eigenvalues.
    pub eigenvalues_real: [f64; BATCH_SIZE],
    /// Imaginary parts of the lane eigenvalues.
    pub eigenvalues_imag: [f64; BATCH_SIZE],
}

impl SymmetryBatch {
    /// Packs `elements` into lanes; lanes past the end hold the identity.
    fn pack(elements: &[(&[u64], &[u32], Complex64)]) -> Self {
        debug_assert!(!elements.is_empty() && elements.len() <= BATCH_SIZE);
        let shifts = elements[0].1.to_vec();
        let mut masks = vec![[0u64; BATCH_SIZE]; shifts.len()];
        let mut eigenvalues_real = [0.0; BATCH_SIZE];
        let mut eigenvalues_imag = [0.0; BATCH_SIZE];
        for (lane, (element_masks, element_shifts, eigenvalue)) in elements.iter().enumerate() {
            assert_eq!(*element_shifts, shifts.as_slice(), "lanes disagree on network layout");
            for (stage, &mask) in element_masks.iter().enumerate() {
                masks[stage][lane] = mask;
            }
            eigenvalues_real[lane] = eigenvalue.re;
            eigenvalues_imag[lane] = eigenvalue.im;
        }
        Self {
            masks,
            shifts,
            eigenvalues_real,
            eigenvalues_imag,
        }
    }

    /// Number of network stages.
    pub fn depth(&self) -> usize {
        self.masks.len()
    }
}

/// Batched group body for configurations on at most 64 sites.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SmallBasisBody {
    /// Full batches.
    pub batched_symmetries: Vec<SymmetryBatch>,
    /// Remaining elements, padded to a full batch.
    pub other_symmetries: Option<SymmetryBatch>,
    /// Number of meaningful lanes in `other_symmetries`.
    pub number_other_symmetries: usize,
}

impl SmallBasisBody {
    /// Packs the elements of `group` in group order.
    pub fn from_group(group: &Group) -> Result<Self, LsError> {
        let elements = group
            .symmetries()
            .iter()
            .map(|symmetry| match symmetry.payload() {
                SymmetryPayload::Small(s) => Ok((
                    s.network.masks.as_slice(),
                    s.network.shifts.as_slice(),
                    s.eigenvalue,
                )),
                SymmetryPayload::Big(_) => Err(LsError::InvalidNumberOfSites(
                    ErrorInfo::new("basis-too-wide", "group acts on more than 64 sites")
                        .with_context("number_of_sites", symmetry.number_of_sites().to_string())
                        .with_hint("use the wide basis body"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut chunks = elements.chunks_exact(BATCH_SIZE);
        let batched_symmetries: Vec<SymmetryBatch> =
            chunks.by_ref().map(SymmetryBatch::pack).collect();
        let rest = chunks.remainder();
        let other_symmetries = (!rest.is_empty()).then(|| SymmetryBatch::pack(rest));
        debug!(
            batches = batched_symmetries.len(),
            rest = rest.len(),
            "packed narrow basis body"
        );
        Ok(Self {
            batched_symmetries,
            other_symmetries,
            number_other_symmetries: rest.len(),
        })
    }

    /// Number of group elements represented.
    pub fn number_of_symmetries(&self) -> usize {
        BATCH_SIZE * self.batched_symmetries.len() + self.number_other_symmetries
    }
}

/// Group body for configurations on more than 64 sites.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BigBasisBody {
    /// Elements in group order.
    pub symmetries: Vec<BigSymmetry>,
}

impl BigBasisBody {
    /// Collects the elements of `group` in group order.
    ///
    /// Narrow elements are widened, so any group can be evaluated on the wide path.
    pub fn from_group(group: &Group) -> Self {
        let symmetries = group
            .symmetries()
            .iter()
            .map(|symmetry| match symmetry.payload() {
                SymmetryPayload::Big(s) => s.clone(),
                SymmetryPayload::Small(s) => BigSymmetry {
                    network: BigNetwork {
                        number_of_sites: s.network.number_of_sites,
                        masks: s.network.masks.iter().map(|&m| Bits512::from_u64(m)).collect(),
                        shifts: s.network.shifts.clone(),
                    },
                    eigenvalue: s.eigenvalue,
                },
            })
            .collect();
        Self { symmetries }
    }
}

/// Group body matching the configuration width.
#[derive(Debug, Clone, PartialEq)]
pub enum BasisBody {
    /// At most 64 sites.
    Small(SmallBasisBody),
    /// More than 64 sites.
    Big(BigBasisBody),
}

/// Header plus body for one group and spin-inversion mode. Holds no states.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinBasis {
    /// Shared parameters.
    pub header: BasisHeader,
    /// Width-specific group layout.
    pub body: BasisBody,
}

impl SpinBasis {
    /// Lays out `group` for the engine.
    pub fn new(group: &Group, spin_inversion: i32) -> Result<Self, LsError> {
        let header = BasisHeader::for_group(group, spin_inversion)?;
        let body = if is_wide(header.number_of_sites) {
            BasisBody::Big(BigBasisBody::from_group(group))
        } else {
            BasisBody::Small(SmallBasisBody::from_group(group)?)
        };
        Ok(Self { header, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsym_group::Symmetry;

    fn cyclic_group(sites: usize) -> Group {
        let shift: Vec<u16> = (0..sites).map(|i| ((i + 1) % sites) as u16).collect();
        Group::new(&[Symmetry::new(shift, 0).unwrap()]).unwrap()
    }

    #[test]
    fn twelve_elements_make_one_batch_and_a_rest() {
        let group = cyclic_group(12);
        let body = SmallBasisBody::from_group(&group).unwrap();
        assert_eq!(body.batched_symmetries.len(), 1);
        assert_eq!(body.number_other_symmetries, 4);
        assert_eq!(body.number_of_symmetries(), 12);
        let rest = body.other_symmetries.as_ref().unwrap();
        assert_eq!(rest.depth(), group.network_depth().unwrap());
        for stage in 0..rest.depth() {
            assert_eq!(rest.masks[stage][4..], [0; 4]);
        }
    }

    #[test]
    fn exact_multiple_has_no_rest() {
        let body = SmallBasisBody::from_group(&cyclic_group(8)).unwrap();
        assert_eq!(body.batched_symmetries.len(), 1);
        assert!(body.other_symmetries.is_none());
    }

    #[test]
    fn header_validation() {
        let group = cyclic_group(4);
        assert!(BasisHeader::for_group(&group, 2).is_err());
        assert!(BasisHeader::for_group(&Group::default(), 0).is_err());
        let header = BasisHeader::for_group(&group, -1).unwrap();
        assert!(header.check_state_64(0b1111).is_ok());
        assert!(matches!(
            header.check_state_64(0b1_0000),
            Err(LsError::InvalidState(_))
        ));
        assert!(header.check_state_512(&Bits512::from_u64(0b1_0000)).is_err());
    }

    #[test]
    fn wide_groups_pick_the_big_body() {
        let basis = SpinBasis::new(&cyclic_group(70), 0).unwrap();
        assert!(matches!(basis.body, BasisBody::Big(ref b) if b.symmetries.len() == 70));
        assert!(SmallBasisBody::from_group(&cyclic_group(70)).is_err());
    }
}
