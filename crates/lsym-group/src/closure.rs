use std::collections::HashMap;

use lsym_core::{ErrorInfo, LsError};
use tracing::debug;

use crate::spec::{compose, specs_equal, SymmetrySpec};

/// Ordered set of specifications with a permutation index for membership tests.
struct Members {
    items: Vec<SymmetrySpec>,
    by_permutation: HashMap<Vec<u16>, Vec<usize>>,
}

impl Members {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            by_permutation: HashMap::new(),
        }
    }

    /// Membership under [`specs_equal`]; contradictory phases surface as errors.
    fn contains(&self, spec: &SymmetrySpec) -> Result<bool, LsError> {
        let Some(candidates) = self.by_permutation.get(&spec.permutation) else {
            return Ok(false);
        };
        for &index in candidates {
            if specs_equal(&self.items[index], spec)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn push(&mut self, spec: SymmetrySpec) {
        self.by_permutation
            .entry(spec.permutation.clone())
            .or_default()
            .push(self.items.len());
        self.items.push(spec);
    }
}

/// Closes `generators` under composition.
///
/// Generators are deduplicated in order. Every pass composes all ordered pairs of
/// the current group and appends the results not seen yet; the loop stops at the
/// first pass that produces nothing new. The first incompatibility aborts the whole
/// closure. An empty input yields an empty group.
pub fn close_generators(generators: Vec<SymmetrySpec>) -> Result<Vec<SymmetrySpec>, LsError> {
    if let Some(first) = generators.first() {
        let expected = first.number_of_sites();
        if let Some(bad) = generators.iter().find(|g| g.number_of_sites() != expected) {
            return Err(LsError::IncompatibleSymmetries(
                ErrorInfo::new(
                    "symmetry-length-mismatch",
                    "generators act on different numbers of sites",
                )
                .with_context("left", expected.to_string())
                .with_context("right", bad.number_of_sites().to_string()),
            ));
        }
    }

    let mut group = Members::new();
    for generator in generators {
        if !group.contains(&generator)? {
            group.push(generator);
        }
    }
    debug!(generators = group.items.len(), "closing symmetry group");

    let mut pass = 0usize;
    loop {
        let mut extra = Members::new();
        for x in &group.items {
            for y in &group.items {
                let z = compose(x, y)?;
                if !group.contains(&z)? && !extra.contains(&z)? {
                    extra.push(z);
                }
            }
        }
        pass += 1;
        debug!(pass, size = group.items.len(), new = extra.items.len(), "closure pass");
        if extra.items.is_empty() {
            break;
        }
        for z in extra.items {
            group.push(z);
        }
    }
    Ok(group.items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(permutation: &[u16], sector: u32, periodicity: u32) -> SymmetrySpec {
        SymmetrySpec {
            permutation: permutation.to_vec(),
            sector,
            periodicity,
        }
    }

    #[test]
    fn empty_generators_give_empty_group() {
        assert!(close_generators(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn duplicate_generators_collapse() {
        let t = spec(&[1, 2, 0], 0, 3);
        let group = close_generators(vec![t.clone(), t]).unwrap();
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn contradictory_generators_fail() {
        let a = spec(&[1, 0], 0, 2);
        let b = spec(&[1, 0], 1, 2);
        assert!(matches!(
            close_generators(vec![a, b]),
            Err(LsError::IncompatibleSymmetries(_))
        ));
    }

    #[test]
    fn generator_lengths_must_agree() {
        let a = spec(&[1, 0], 0, 2);
        let b = spec(&[0, 2, 1], 0, 2);
        assert!(close_generators(vec![a, b]).is_err());
    }
}
