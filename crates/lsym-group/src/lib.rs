#![deny(missing_docs)]
#![doc = "Symmetry elements and the closure engine turning a handful of generators \
(translations, reflections, ...) into a full, deduplicated lattice symmetry group."]

/// Fixpoint closure of generator specifications.
pub mod closure;
/// Compiled symmetry elements and their width-specific payloads.
pub mod element;
/// Ordered, closed groups of symmetry elements.
pub mod group;
/// JSON helpers for generator sets and group summaries.
#[path = "serde.rs"]
pub mod serde_io;
/// Permutation plus phase specifications, their equality and composition.
pub mod spec;

pub use closure::close_generators;
pub use element::{BigSymmetry, CompiledSymmetry, SmallSymmetry, Symmetry, SymmetryPayload};
pub use group::{DumpMasks, Group, SymmetryInfoDump};
pub use serde_io::{
    from_json_slice, to_canonical_json_bytes, ElementSummary, GeneratorSet, GeneratorSpec,
    GroupSummary,
};
pub use spec::{compose, specs_equal, SymmetrySpec};
