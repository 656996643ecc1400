use std::collections::HashSet;

use lsym_core::{Bits512, ErrorInfo, LsError};
use lsym_perm::identity_permutation;
use num_complex::Complex64;
use tracing::{debug, warn};

use crate::closure::close_generators;
use crate::element::{BigSymmetry, CompiledSymmetry, SmallSymmetry, Symmetry, SymmetryPayload};
use crate::serde_io::{ElementSummary, GroupSummary};
use crate::spec::SymmetrySpec;

/// Ordered, deduplicated symmetry group closed under composition.
///
/// All elements share the number of sites and the network depth. A group is built
/// once and then only read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    symmetries: Vec<Symmetry>,
}

/// Masks of a [`SymmetryInfoDump`], one row per network stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpMasks {
    /// `[depth][group_size]` single-word masks.
    Small(Vec<u64>),
    /// `[depth][group_size]` wide masks.
    Big(Vec<Bits512>),
}

/// Flattened network description of every element of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryInfoDump {
    /// Row-major `[depth][group_size]` masks.
    pub masks: DumpMasks,
    /// Shifts of the first element, one per stage.
    pub shifts: Vec<u32>,
    /// Eigenvalues in group order.
    pub eigenvalues: Vec<Complex64>,
}

fn empty_group_error(operation: &str) -> LsError {
    warn!(operation, "symmetry info requested for an empty group");
    LsError::System(
        ErrorInfo::new("group-empty", "group has no elements")
            .with_context("operation", operation),
    )
}

/// Writes element `index` of a `size`-element group into the row-major dump, plus the
/// shifts when asked for them.
fn write_element<S: CompiledSymmetry>(
    symmetry: &S,
    index: usize,
    size: usize,
    masks: &mut [u64],
    shifts: Option<&mut [u32]>,
    eigenvalue: &mut Complex64,
) {
    let depth = symmetry.network_depth();
    let words = S::WORDS_PER_MASK;
    if let Some(shifts) = shifts {
        shifts.copy_from_slice(symmetry.network_shifts());
    }
    for stage in 0..depth {
        let start = (stage * size + index) * words;
        symmetry.write_mask(stage, &mut masks[start..start + words]);
    }
    *eigenvalue = symmetry.eigenvalue();
}

impl Group {
    /// Closes `generators` and compiles every element.
    pub fn new(generators: &[Symmetry]) -> Result<Self, LsError> {
        Self::from_specs(generators.iter().map(Symmetry::to_spec).collect())
    }

    /// Closes generator specifications and compiles every element.
    pub fn from_specs(generators: Vec<SymmetrySpec>) -> Result<Self, LsError> {
        let closed = close_generators(generators)?;
        let mut seen = HashSet::with_capacity(closed.len());
        for spec in &closed {
            if !seen.insert(spec.permutation.as_slice()) {
                return Err(LsError::IncompatibleSymmetries(
                    ErrorInfo::new(
                        "group-duplicate-permutation",
                        "permutation appears with two different periodicities",
                    )
                    .with_hint("give generators their structural periodicity"),
                ));
            }
        }
        let symmetries = closed
            .iter()
            .map(Symmetry::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(size = symmetries.len(), "built symmetry group");
        Ok(Self { symmetries })
    }

    /// Group containing only the identity on `number_of_sites` sites.
    pub fn trivial(number_of_sites: usize) -> Result<Self, LsError> {
        if number_of_sites == 0 {
            return Err(LsError::InvalidNumberOfSites(ErrorInfo::new(
                "trivial-group-no-sites",
                "a group must act on at least one site",
            )));
        }
        let identity = Symmetry::new(identity_permutation(number_of_sites), 0)?;
        Ok(Self {
            symmetries: vec![identity],
        })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.symmetries.len()
    }

    /// Whether the group has no elements.
    pub fn is_empty(&self) -> bool {
        self.symmetries.is_empty()
    }

    /// Elements in group order.
    pub fn symmetries(&self) -> &[Symmetry] {
        &self.symmetries
    }

    /// Number of sites, or `None` for an empty group.
    pub fn number_of_sites(&self) -> Option<usize> {
        self.symmetries.first().map(Symmetry::number_of_sites)
    }

    /// Common network depth, or `None` for an empty group.
    pub fn network_depth(&self) -> Option<usize> {
        let depth = self.symmetries.first()?.network_depth();
        assert!(
            self.symmetries.iter().all(|s| s.network_depth() == depth),
            "group elements have different network depths"
        );
        Some(depth)
    }

    /// Collects masks, shifts and eigenvalues of every element.
    pub fn dump_symmetry_info(&self) -> Result<SymmetryInfoDump, LsError> {
        let depth = self
            .network_depth()
            .ok_or_else(|| empty_group_error("dump_symmetry_info"))?;
        let words = self.words_per_mask();
        let mut flat = vec![0u64; depth * self.len() * words];
        let mut shifts = vec![0u32; depth];
        let mut eigenvalues = vec![Complex64::new(0.0, 0.0); self.len()];
        self.dump_into(&mut flat, &mut shifts, &mut eigenvalues)?;
        let masks = if words == 1 {
            DumpMasks::Small(flat)
        } else {
            DumpMasks::Big(
                flat.chunks_exact(8)
                    .map(|chunk| {
                        let mut bits = Bits512::ZERO;
                        bits.words.copy_from_slice(chunk);
                        bits
                    })
                    .collect(),
            )
        };
        Ok(SymmetryInfoDump {
            masks,
            shifts,
            eigenvalues,
        })
    }

    /// Number of `u64` words each mask occupies in [`Group::dump_into`].
    pub fn words_per_mask(&self) -> usize {
        match self.symmetries.first().map(Symmetry::payload) {
            Some(SymmetryPayload::Big(_)) => BigSymmetry::WORDS_PER_MASK,
            _ => SmallSymmetry::WORDS_PER_MASK,
        }
    }

    /// Writes the dump into caller-provided buffers.
    ///
    /// `masks` holds `depth * len * words_per_mask` words in row-major
    /// `[depth][group_size]` order, `shifts` holds `depth` entries and `eigenvalues`
    /// `len` entries. Buffers are left untouched when the group is empty or a buffer
    /// is too short.
    pub fn dump_into(
        &self,
        masks: &mut [u64],
        shifts: &mut [u32],
        eigenvalues: &mut [Complex64],
    ) -> Result<(), LsError> {
        let first = self
            .symmetries
            .first()
            .ok_or_else(|| empty_group_error("dump_into"))?;
        let depth = first.network_depth();
        let size = self.len();
        let words = self.words_per_mask();
        if masks.len() < depth * size * words || shifts.len() < depth || eigenvalues.len() < size
        {
            return Err(LsError::System(
                ErrorInfo::new("dump-buffer-too-short", "output buffer is too short")
                    .with_context("depth", depth.to_string())
                    .with_context("size", size.to_string())
                    .with_context("words", words.to_string()),
            ));
        }
        for (index, symmetry) in self.symmetries.iter().enumerate() {
            assert_eq!(
                symmetry.network_depth(),
                depth,
                "group elements have different network depths"
            );
            let first_shifts = (index == 0).then_some(&mut shifts[..depth]);
            let eigenvalue = &mut eigenvalues[index];
            match symmetry.payload() {
                SymmetryPayload::Small(s) => {
                    write_element(s, index, size, masks, first_shifts, eigenvalue)
                }
                SymmetryPayload::Big(s) => {
                    write_element(s, index, size, masks, first_shifts, eigenvalue)
                }
            }
        }
        Ok(())
    }

    /// Serializable description of the group.
    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            size: self.len(),
            number_of_sites: self.number_of_sites(),
            network_depth: self.network_depth(),
            elements: self
                .symmetries
                .iter()
                .map(|s| {
                    let eigenvalue = s.eigenvalue();
                    ElementSummary {
                        permutation: s.permutation().to_vec(),
                        sector: s.sector(),
                        periodicity: s.periodicity(),
                        eigenvalue: [eigenvalue.re, eigenvalue.im],
                    }
                })
                .collect(),
        }
    }
}
