//! Rational phases quantising symmetry eigenvalues as roots of unity.

use std::f64::consts::PI;
use std::fmt::{self, Display};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, LsError};

/// Greatest common divisor, with `gcd(0, b) == b`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn gcd_wide(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Reduced fraction `numerator / denominator` standing for `exp(2πi·numerator/denominator)`.
///
/// Invariants: `0 <= numerator < denominator` and `gcd(numerator, denominator) == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phase {
    numerator: u32,
    denominator: u32,
}

impl Phase {
    /// The trivial phase `0/1`.
    pub const ZERO: Phase = Phase {
        numerator: 0,
        denominator: 1,
    };

    /// Builds a phase from an arbitrary fraction, reducing it and taking it modulo one.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, LsError> {
        if denominator == 0 {
            return Err(LsError::InvalidSector(
                ErrorInfo::new("phase-zero-denominator", "phase denominator must be positive")
                    .with_context("numerator", numerator.to_string()),
            ));
        }
        Ok(Self::reduced(u64::from(numerator), u64::from(denominator)))
    }

    fn reduced(p: u64, q: u64) -> Self {
        let m = gcd(p, q);
        let (p, q) = (p / m, q / m);
        Self {
            numerator: (p % q) as u32,
            denominator: q as u32,
        }
    }

    /// Numerator of the reduced fraction.
    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    /// Denominator of the reduced fraction.
    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Rational addition reduced to lowest terms, modulo one.
    ///
    /// Cross products are formed in 128 bits. Fails when the reduced denominator does
    /// not fit 32 bits, which no `u32` periodicity can realise.
    pub fn add(self, other: Phase) -> Result<Phase, LsError> {
        let (a, b) = (u128::from(self.numerator), u128::from(self.denominator));
        let (c, d) = (u128::from(other.numerator), u128::from(other.denominator));
        let p = a * d + c * b;
        let q = b * d;
        let m = gcd_wide(p, q);
        let (p, q) = (p / m, q / m);
        let denominator = u32::try_from(q).map_err(|_| {
            LsError::incompatible(
                "phase-denominator-overflow",
                format!("sum of {self} and {other} has denominator {q}"),
            )
        })?;
        Ok(Self {
            numerator: (p % q) as u32,
            denominator,
        })
    }

    /// The phase as a fraction of a full turn.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::ZERO
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Unit-modulus eigenvalue `exp(2πi·sector/periodicity)`.
///
/// Components within `1e-15` of zero are snapped to exactly zero so that quarter
/// turns produce exact real or imaginary units.
pub fn compute_eigenvalue(sector: u32, periodicity: u32) -> Complex64 {
    debug_assert!(periodicity > 0);
    let angle = 2.0 * PI * f64::from(sector) / f64::from(periodicity);
    let snap = |x: f64| if x.abs() < 1.0e-15 { 0.0 } else { x };
    Complex64::new(snap(angle.cos()), snap(angle.sin()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_wraps_around_one() {
        let half = Phase::new(1, 2).unwrap();
        assert_eq!(half.add(half).unwrap(), Phase::ZERO);
        let three_quarters = Phase::new(3, 4).unwrap();
        assert_eq!(three_quarters.add(half).unwrap(), Phase::new(1, 4).unwrap());
    }

    #[test]
    fn quarter_turn_is_exact() {
        let z = compute_eigenvalue(1, 4);
        assert_eq!(z.re, 0.0);
        assert_eq!(z.im, 1.0);
    }
}
