use lsym_core::{gcd, ErrorInfo, LsError, MAX_NUMBER_OF_SITES};

/// Identity permutation on `number_of_sites` sites.
pub fn identity_permutation(number_of_sites: usize) -> Vec<u16> {
    (0..number_of_sites).map(|i| i as u16).collect()
}

/// Checks that `permutation` is a bijection on `0..permutation.len()` and that it fits
/// into a 512-bit configuration.
pub fn validate_permutation(permutation: &[u16]) -> Result<(), LsError> {
    let n = permutation.len();
    if n == 0 {
        return Err(LsError::InvalidNumberOfSites(ErrorInfo::new(
            "permutation-empty",
            "permutation must act on at least one site",
        )));
    }
    if n > MAX_NUMBER_OF_SITES {
        return Err(LsError::InvalidNumberOfSites(
            ErrorInfo::new("permutation-too-long", "permutation acts on too many sites")
                .with_context("length", n.to_string())
                .with_context("max", MAX_NUMBER_OF_SITES.to_string()),
        ));
    }
    let mut seen = vec![false; n];
    for (index, &target) in permutation.iter().enumerate() {
        let target = usize::from(target);
        if target >= n {
            return Err(LsError::InvalidPermutation(
                ErrorInfo::new("permutation-out-of-range", "site index out of range")
                    .with_context("index", index.to_string())
                    .with_context("value", target.to_string())
                    .with_context("length", n.to_string()),
            ));
        }
        if seen[target] {
            return Err(LsError::InvalidPermutation(
                ErrorInfo::new("permutation-duplicate", "site index appears twice")
                    .with_context("value", target.to_string()),
            ));
        }
        seen[target] = true;
    }
    Ok(())
}

/// Structural periodicity: the smallest `k > 0` with `permutation^k == identity`.
///
/// Computed as the least common multiple of the cycle lengths. The result saturates
/// at `u64::MAX`; callers reject anything that does not fit their phase width.
pub fn compute_periodicity(permutation: &[u16]) -> u64 {
    let n = permutation.len();
    let mut visited = vec![false; n];
    let mut order = 1u64;
    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut length = 0u64;
        let mut current = start;
        while !visited[current] {
            visited[current] = true;
            current = usize::from(permutation[current]);
            length += 1;
        }
        let step = length / gcd(order, length);
        order = order.saturating_mul(step);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodicity_is_lcm_of_cycles() {
        assert_eq!(compute_periodicity(&[0, 1, 2, 3]), 1);
        assert_eq!(compute_periodicity(&[1, 2, 3, 0]), 4);
        // (0 1)(2 3 4)
        assert_eq!(compute_periodicity(&[1, 0, 3, 4, 2]), 6);
    }

    #[test]
    fn malformed_permutations_are_rejected() {
        assert!(matches!(
            validate_permutation(&[]),
            Err(LsError::InvalidNumberOfSites(_))
        ));
        assert!(matches!(
            validate_permutation(&[0, 0]),
            Err(LsError::InvalidPermutation(_))
        ));
        assert!(matches!(
            validate_permutation(&[0, 2]),
            Err(LsError::InvalidPermutation(_))
        ));
        assert!(validate_permutation(&[1, 0]).is_ok());
    }
}
