#![allow(dead_code)]

use lsym_core::Bits512;
use lsym_group::{Group, Symmetry};
use num_complex::Complex64;

pub fn translation(sites: usize) -> Vec<u16> {
    (0..sites).map(|i| ((i + 1) % sites) as u16).collect()
}

pub fn reflection(sites: usize) -> Vec<u16> {
    (0..sites).map(|i| (sites - 1 - i) as u16).collect()
}

/// Chain of `sites` sites with momentum `sector`, plus parity when it is compatible.
pub fn chain_group(sites: usize, sector: u32, with_reflection: bool) -> Group {
    let sector = sector % sites as u32;
    let mut generators = vec![Symmetry::new(translation(sites), sector).unwrap()];
    if with_reflection && sites > 2 && (2 * sector) % sites as u32 == 0 {
        generators.push(Symmetry::new(reflection(sites), 0).unwrap());
    }
    Group::new(&generators).unwrap()
}

/// Every image of `bits` (spin-flipped ones included) with its eigenvalue.
pub fn orbit_64(group: &Group, spin_inversion: i32, bits: u64) -> Vec<(u64, Complex64)> {
    let sites = group.number_of_sites().unwrap();
    let flip = if sites == 64 { !0 } else { (1u64 << sites) - 1 };
    let mut images = Vec::new();
    for symmetry in group.symmetries() {
        let image = symmetry.apply_64(bits).unwrap();
        images.push((image, symmetry.eigenvalue()));
        if spin_inversion != 0 {
            images.push((image ^ flip, f64::from(spin_inversion) * symmetry.eigenvalue()));
        }
    }
    images
}

pub fn orbit_512(group: &Group, spin_inversion: i32, bits: &Bits512) -> Vec<(Bits512, Complex64)> {
    let sites = group.number_of_sites().unwrap();
    let flip = lsym_core::flip_mask_512(sites);
    let mut images = Vec::new();
    for symmetry in group.symmetries() {
        let image = symmetry.apply_512(bits);
        images.push((image, symmetry.eigenvalue()));
        if spin_inversion != 0 {
            images.push((image ^ flip, f64::from(spin_inversion) * symmetry.eigenvalue()));
        }
    }
    images
}

pub fn expected_norm(stabilizer_sum: f64, images: usize) -> f64 {
    let n = if stabilizer_sum.abs() <= 1.0e-5 { 0.0 } else { stabilizer_sum };
    (n / images as f64).sqrt()
}

pub fn close(a: Complex64, b: Complex64) -> bool {
    (a - b).norm() < 1e-10
}
