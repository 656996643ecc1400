//! Portable kernels. Every capability tier compiles these same functions under its own
//! target features, so all tiers agree bit for bit.

use lsym_core::{flip_mask_512, flip_mask_64, Bits512};
use num_complex::Complex64;

use crate::basis::{BasisHeader, BigBasisBody, SmallBasisBody, SymmetryBatch, BATCH_SIZE};

/// Sums below this magnitude are rounding noise of a vanishing stabilizer sum.
const NORM_THRESHOLD: f64 = 1.0e-5;

/// Canonical representative of a configuration with its character and norm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateInfo<B> {
    /// Minimal image over the group (and spin inversion).
    pub representative: B,
    /// Eigenvalue of the element mapping the input onto `representative`.
    pub character: Complex64,
    /// `sqrt(stabilizer sum / group size)`; zero for states annihilated by the projector.
    pub norm: f64,
}

impl<B> StateInfo<B> {
    fn unchanged(bits: B) -> Self {
        Self {
            representative: bits,
            character: Complex64::new(1.0, 0.0),
            norm: 1.0,
        }
    }
}

type Lanes<T> = [T; BATCH_SIZE];

/// Per-lane running state of the narrow engine.
struct Accumulator {
    original: u64,
    r: Lanes<u64>,
    n: Lanes<f64>,
    e_re: Lanes<f64>,
    e_im: Lanes<f64>,
}

impl Accumulator {
    #[inline(always)]
    fn new(bits: u64) -> Self {
        Self {
            original: bits,
            r: [bits; BATCH_SIZE],
            n: [0.0; BATCH_SIZE],
            e_re: [1.0; BATCH_SIZE],
            e_im: [0.0; BATCH_SIZE],
        }
    }

    /// Folds in the first `count` lanes.
    #[inline(always)]
    fn update(&mut self, x: &Lanes<u64>, real: &Lanes<f64>, imag: &Lanes<f64>, count: usize) {
        for lane in 0..BATCH_SIZE {
            let include = lane < count;
            if include && x[lane] < self.r[lane] {
                self.r[lane] = x[lane];
                self.e_re[lane] = real[lane];
                self.e_im[lane] = imag[lane];
            }
            if include && x[lane] == self.original {
                self.n[lane] += real[lane];
            }
        }
    }

    /// Stabilizer-only update; returns false when some lane found a smaller image.
    #[inline(always)]
    fn update_norm_only(&mut self, x: &Lanes<u64>, real: &Lanes<f64>, count: usize) -> bool {
        let mut any_smaller = false;
        for lane in 0..BATCH_SIZE {
            any_smaller |= lane < count && x[lane] < self.r[lane];
        }
        if any_smaller {
            return false;
        }
        for lane in 0..BATCH_SIZE {
            if lane < count && x[lane] == self.original {
                self.n[lane] += real[lane];
            }
        }
        true
    }

    #[inline(always)]
    fn reduce_norm_only(&self) -> f64 {
        let n = &self.n;
        ((n[0] + n[4]) + (n[2] + n[6])) + ((n[1] + n[5]) + (n[3] + n[7]))
    }

    /// Halves 8 -> 4 -> 2 -> 1 lanes, keeping the lower half only when strictly smaller.
    #[inline(always)]
    fn reduce(&self) -> (u64, Complex64, f64) {
        let norm = self.reduce_norm_only();
        let mut r = self.r;
        let mut e_re = self.e_re;
        let mut e_im = self.e_im;
        let mut width = BATCH_SIZE / 2;
        while width > 0 {
            for lane in 0..width {
                if r[lane + width] <= r[lane] {
                    r[lane] = r[lane + width];
                    e_re[lane] = e_re[lane + width];
                    e_im[lane] = e_im[lane + width];
                }
            }
            width /= 2;
        }
        (r[0], Complex64::new(e_re[0], e_im[0]), norm)
    }
}

#[inline(always)]
fn benes_forward(x: &mut Lanes<u64>, batch: &SymmetryBatch) {
    for (masks, &shift) in batch.masks.iter().zip(&batch.shifts) {
        for lane in 0..BATCH_SIZE {
            let t = ((x[lane] >> shift) ^ x[lane]) & masks[lane];
            x[lane] ^= t ^ (t << shift);
        }
    }
}

/// Batches of the body with the number of meaningful lanes in each.
#[inline(always)]
fn batches(body: &SmallBasisBody) -> impl Iterator<Item = (&SymmetryBatch, usize)> {
    let rest = body.number_other_symmetries;
    body.batched_symmetries
        .iter()
        .map(|batch| (batch, BATCH_SIZE))
        .chain(body.other_symmetries.iter().map(move |batch| (batch, rest)))
}

#[inline(always)]
fn clamp_stabilizer_sum(n: f64) -> f64 {
    let n = if n.abs() <= NORM_THRESHOLD { 0.0 } else { n };
    assert!(n >= 0.0, "stabilizer sum is negative: {n}");
    n
}

#[inline(always)]
fn finish_norm(n: f64, group_size: usize, spin_inversion: i32) -> f64 {
    let factor = if spin_inversion != 0 { 2 } else { 1 };
    (clamp_stabilizer_sum(n) / (factor * group_size) as f64).sqrt()
}

#[inline(always)]
pub(crate) fn state_info_64(
    header: &BasisHeader,
    body: &SmallBasisBody,
    bits: u64,
) -> StateInfo<u64> {
    if !header.has_symmetries {
        return StateInfo::unchanged(bits);
    }
    let flip_mask = flip_mask_64(header.number_of_sites);
    let flip_coeff = f64::from(header.spin_inversion);
    let mut acc = Accumulator::new(bits);
    for (batch, count) in batches(body) {
        let mut x = [acc.original; BATCH_SIZE];
        benes_forward(&mut x, batch);
        let mut real = batch.eigenvalues_real;
        let mut imag = batch.eigenvalues_imag;
        acc.update(&x, &real, &imag, count);
        if header.spin_inversion != 0 {
            for lane in x.iter_mut() {
                *lane ^= flip_mask;
            }
            if header.spin_inversion != 1 {
                for lane in 0..BATCH_SIZE {
                    real[lane] *= flip_coeff;
                    imag[lane] *= flip_coeff;
                }
            }
            acc.update(&x, &real, &imag, count);
        }
    }
    let (representative, character, n) = acc.reduce();
    StateInfo {
        representative,
        character,
        norm: finish_norm(n, body.number_of_symmetries(), header.spin_inversion),
    }
}

#[inline(always)]
pub(crate) fn is_representative_64(
    header: &BasisHeader,
    body: &SmallBasisBody,
    bits: u64,
) -> bool {
    if !header.has_symmetries {
        return true;
    }
    let flip_mask = flip_mask_64(header.number_of_sites);
    let flip_coeff = f64::from(header.spin_inversion);
    let mut acc = Accumulator::new(bits);
    for (batch, count) in batches(body) {
        let mut x = [acc.original; BATCH_SIZE];
        benes_forward(&mut x, batch);
        let mut real = batch.eigenvalues_real;
        if !acc.update_norm_only(&x, &real, count) {
            return false;
        }
        if header.spin_inversion != 0 {
            for lane in 0..BATCH_SIZE {
                x[lane] ^= flip_mask;
                real[lane] *= flip_coeff;
            }
            if !acc.update_norm_only(&x, &real, count) {
                return false;
            }
        }
    }
    clamp_stabilizer_sum(acc.reduce_norm_only()) > 0.0
}

#[inline(always)]
pub(crate) fn state_info_512(
    header: &BasisHeader,
    body: &BigBasisBody,
    bits: &Bits512,
) -> StateInfo<Bits512> {
    if !header.has_symmetries {
        return StateInfo::unchanged(*bits);
    }
    let flip_mask = flip_mask_512(header.number_of_sites);
    let flip_coeff = f64::from(header.spin_inversion);
    let mut r = *bits;
    let mut n = 0.0;
    let mut e = Complex64::new(1.0, 0.0);
    for symmetry in &body.symmetries {
        let mut buffer = symmetry.network.apply(bits);
        if buffer < r {
            r = buffer;
            e = symmetry.eigenvalue;
        } else if buffer == *bits {
            n += symmetry.eigenvalue.re;
        }
        if header.spin_inversion != 0 {
            buffer ^= flip_mask;
            if buffer < r {
                r = buffer;
                e = flip_coeff * symmetry.eigenvalue;
            } else if buffer == *bits {
                n += flip_coeff * symmetry.eigenvalue.re;
            }
        }
    }
    StateInfo {
        representative: r,
        character: e,
        norm: finish_norm(n, body.symmetries.len(), header.spin_inversion),
    }
}

#[inline(always)]
pub(crate) fn is_representative_512(
    header: &BasisHeader,
    body: &BigBasisBody,
    bits: &Bits512,
) -> bool {
    if !header.has_symmetries {
        return true;
    }
    let flip_mask = flip_mask_512(header.number_of_sites);
    let flip_coeff = f64::from(header.spin_inversion);
    let mut n = 0.0;
    for symmetry in &body.symmetries {
        let mut buffer = symmetry.network.apply(bits);
        if buffer < *bits {
            return false;
        }
        if buffer == *bits {
            n += symmetry.eigenvalue.re;
        }
        if header.spin_inversion != 0 {
            buffer ^= flip_mask;
            if buffer < *bits {
                return false;
            }
            if buffer == *bits {
                n += flip_coeff * symmetry.eigenvalue.re;
            }
        }
    }
    clamp_stabilizer_sum(n) > 0.0
}
