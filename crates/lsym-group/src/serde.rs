use std::collections::BTreeMap;
use std::iter::FromIterator;

use ::serde::{Deserialize, Serialize};
use lsym_core::{ErrorInfo, LsError};
use serde_json::{Map, Value};

use crate::element::Symmetry;
use crate::group::Group;

fn serde_error(code: &str, err: impl ToString) -> LsError {
    LsError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut ordered = BTreeMap::new();
            for (key, val) in map {
                ordered.insert(key, canonicalize(val));
            }
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into JSON bytes with sorted object keys.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, LsError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    let canonical = canonicalize(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical).map_err(|err| serde_error("json-write", err))?;
    Ok(bytes)
}

/// Restores a value from JSON bytes.
pub fn from_json_slice<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, LsError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-read", err))
}

/// One generator as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSpec {
    /// Site mapping.
    pub permutation: Vec<u16>,
    /// Sector; the periodicity is derived from the permutation.
    #[serde(default)]
    pub sector: u32,
}

/// Generators of a lattice symmetry group plus the spin-inversion mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSet {
    /// Number of lattice sites.
    pub number_of_sites: usize,
    /// `0` for no spin inversion, otherwise `1` or `-1`.
    #[serde(default)]
    pub spin_inversion: i32,
    /// Generating permutations.
    #[serde(default)]
    pub generators: Vec<GeneratorSpec>,
}

impl GeneratorSet {
    /// Compiles the generators and closes them into a group.
    ///
    /// Without generators the trivial group on `number_of_sites` sites is returned.
    pub fn build_group(&self) -> Result<Group, LsError> {
        if !matches!(self.spin_inversion, -1..=1) {
            return Err(LsError::InvalidSector(
                ErrorInfo::new("spin-inversion-out-of-range", "spin inversion must be 0, 1 or -1")
                    .with_context("spin_inversion", self.spin_inversion.to_string()),
            ));
        }
        if self.generators.is_empty() {
            return Group::trivial(self.number_of_sites);
        }
        let symmetries = self
            .generators
            .iter()
            .enumerate()
            .map(|(index, generator)| {
                if generator.permutation.len() != self.number_of_sites {
                    return Err(LsError::InvalidNumberOfSites(
                        ErrorInfo::new(
                            "generator-length-mismatch",
                            "generator does not act on number_of_sites sites",
                        )
                        .with_context("generator", index.to_string())
                        .with_context("length", generator.permutation.len().to_string())
                        .with_context("number_of_sites", self.number_of_sites.to_string()),
                    ));
                }
                Symmetry::new(generator.permutation.clone(), generator.sector)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Group::new(&symmetries)
    }
}

/// Serializable description of one group element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSummary {
    /// Site mapping.
    pub permutation: Vec<u16>,
    /// Phase numerator.
    pub sector: u32,
    /// Phase denominator.
    pub periodicity: u32,
    /// Eigenvalue as `[re, im]`.
    pub eigenvalue: [f64; 2],
}

/// Serializable description of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Number of elements.
    pub size: usize,
    /// Number of sites, absent for an empty group.
    pub number_of_sites: Option<usize>,
    /// Common network depth, absent for an empty group.
    pub network_depth: Option<usize>,
    /// Elements in group order.
    pub elements: Vec<ElementSummary>,
}
