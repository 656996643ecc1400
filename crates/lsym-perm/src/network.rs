//! Benes networks: permutations compiled into sequences of masked delta swaps.
//!
//! A network on `size = 2^k` positions has `2k - 1` stages. Stage `s` swaps bits
//! `p` and `p + shift` wherever bit `p` of its mask is set, with shifts
//! `size/2, size/4, ..., 1, ..., size/4, size/2`. Bit `i` of the input ends up at
//! bit `permutation[i]` of the output. The depth only depends on the number of
//! sites, so every element of a group shares it.

use lsym_core::{Bits512, ErrorInfo, LsError, SMALL_NUMBER_OF_SITES};
use serde::{Deserialize, Serialize};

use crate::permutation::validate_permutation;

/// Compiled network with full-width masks, independent of the configuration width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenesNetwork {
    number_of_sites: usize,
    masks: Vec<Bits512>,
    shifts: Vec<u32>,
}

impl BenesNetwork {
    /// Compiles `permutation` into a network. Fails on malformed permutations.
    pub fn compile(permutation: &[u16]) -> Result<Self, LsError> {
        validate_permutation(permutation)?;
        let number_of_sites = permutation.len();
        let size = number_of_sites.next_power_of_two().max(2);
        let depth = 2 * size.trailing_zeros() as usize - 1;
        let shifts = (0..depth)
            .map(|stage| {
                let level = stage.min(depth - 1 - stage);
                (size >> (level + 1)) as u32
            })
            .collect();
        let mut masks = vec![Bits512::ZERO; depth];
        let target: Vec<usize> = (0..size)
            .map(|i| {
                if i < number_of_sites {
                    usize::from(permutation[i])
                } else {
                    i
                }
            })
            .collect();
        route(&mut masks, &target, 0, 0);
        Ok(Self {
            number_of_sites,
            masks,
            shifts,
        })
    }

    /// Number of sites the permutation acts on.
    pub fn number_of_sites(&self) -> usize {
        self.number_of_sites
    }

    /// Number of delta-swap stages.
    pub fn depth(&self) -> usize {
        self.masks.len()
    }

    /// Per-stage masks.
    pub fn masks(&self) -> &[Bits512] {
        &self.masks
    }

    /// Per-stage shifts.
    pub fn shifts(&self) -> &[u32] {
        &self.shifts
    }

    /// Applies the network to a wide configuration.
    pub fn apply(&self, bits: Bits512) -> Bits512 {
        let mut x = bits;
        for (mask, &shift) in self.masks.iter().zip(&self.shifts) {
            let t = ((x >> shift) ^ x) & *mask;
            x ^= t ^ (t << shift);
        }
        x
    }

    /// Recovers the permutation by tracking where each site is routed.
    pub fn permutation(&self) -> Vec<u16> {
        let size = self.shifts.first().map_or(2, |&s| 2 * s as usize);
        let mut occupant: Vec<usize> = (0..size).collect();
        for (mask, &shift) in self.masks.iter().zip(&self.shifts) {
            let shift = shift as usize;
            for position in 0..size {
                if mask.bit(position) {
                    occupant.swap(position, position + shift);
                }
            }
        }
        let mut permutation = vec![0u16; self.number_of_sites];
        for (position, &site) in occupant.iter().enumerate() {
            if site < self.number_of_sites {
                permutation[site] = position as u16;
            }
        }
        permutation
    }

    /// Narrows the network to 64-bit masks. Fails when it spans more than 64 sites.
    pub fn to_small(&self) -> Result<SmallNetwork, LsError> {
        if self.number_of_sites > SMALL_NUMBER_OF_SITES {
            return Err(LsError::System(
                ErrorInfo::new("network-too-wide", "network does not fit into 64-bit masks")
                    .with_context("sites", self.number_of_sites.to_string()),
            ));
        }
        Ok(SmallNetwork {
            number_of_sites: self.number_of_sites,
            masks: self.masks.iter().map(|m| m.words[0]).collect(),
            shifts: self.shifts.clone(),
        })
    }

    /// Keeps the full-width masks.
    pub fn to_big(&self) -> BigNetwork {
        BigNetwork {
            number_of_sites: self.number_of_sites,
            masks: self.masks.clone(),
            shifts: self.shifts.clone(),
        }
    }
}

/// Looping algorithm: colours every element top or bottom so that partners at the
/// input and at the output switches always land in different sub-networks, then
/// recurses into both halves.
fn route(masks: &mut [Bits512], target: &[usize], offset: usize, level: usize) {
    let m = target.len();
    let depth = masks.len();
    if m == 2 {
        if target[0] == 1 {
            masks[level].set_bit(offset, true);
        }
        return;
    }
    let h = m / 2;
    let mut source = vec![0usize; m];
    for (a, &o) in target.iter().enumerate() {
        source[o] = a;
    }
    // None: unassigned, Some(false): top, Some(true): bottom
    let mut bottom: Vec<Option<bool>> = vec![None; m];
    for start in 0..m {
        if bottom[start].is_some() {
            continue;
        }
        let mut a = start;
        loop {
            bottom[a] = Some(false);
            let partner = a ^ h;
            bottom[partner] = Some(true);
            let next = source[target[partner] ^ h];
            if bottom[next].is_some() {
                break;
            }
            a = next;
        }
    }

    let mut top_target = vec![0usize; h];
    let mut bottom_target = vec![0usize; h];
    for (a, &out) in target.iter().enumerate() {
        let goes_bottom = bottom[a] == Some(true);
        if goes_bottom && a < h {
            masks[level].set_bit(offset + a, true);
        }
        if goes_bottom && out < h {
            masks[depth - 1 - level].set_bit(offset + out, true);
        }
        if goes_bottom {
            bottom_target[a & (h - 1)] = out & (h - 1);
        } else {
            top_target[a & (h - 1)] = out & (h - 1);
        }
    }
    route(masks, &top_target, offset, level + 1);
    route(masks, &bottom_target, offset + h, level + 1);
}

/// Network with 64-bit masks for configurations on at most 64 sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallNetwork {
    /// Number of sites the permutation acts on.
    pub number_of_sites: usize,
    /// Per-stage masks.
    pub masks: Vec<u64>,
    /// Per-stage shifts.
    pub shifts: Vec<u32>,
}

impl SmallNetwork {
    /// Number of stages.
    pub fn depth(&self) -> usize {
        self.masks.len()
    }

    /// Applies the network to a configuration.
    #[inline]
    pub fn apply(&self, bits: u64) -> u64 {
        let mut x = bits;
        for (&mask, &shift) in self.masks.iter().zip(&self.shifts) {
            let t = ((x >> shift) ^ x) & mask;
            x ^= t ^ (t << shift);
        }
        x
    }
}

/// Network with 512-bit masks for configurations on more than 64 sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigNetwork {
    /// Number of sites the permutation acts on.
    pub number_of_sites: usize,
    /// Per-stage masks.
    pub masks: Vec<Bits512>,
    /// Per-stage shifts.
    pub shifts: Vec<u32>,
}

impl BigNetwork {
    /// Number of stages.
    pub fn depth(&self) -> usize {
        self.masks.len()
    }

    /// Applies the network to a configuration.
    pub fn apply(&self, bits: &Bits512) -> Bits512 {
        let mut x = *bits;
        for (mask, &shift) in self.masks.iter().zip(&self.shifts) {
            let t = ((x >> shift) ^ x) & *mask;
            x ^= t ^ (t << shift);
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_follows_padded_size() {
        assert_eq!(BenesNetwork::compile(&[0]).unwrap().depth(), 1);
        assert_eq!(BenesNetwork::compile(&[1, 0]).unwrap().depth(), 1);
        assert_eq!(BenesNetwork::compile(&[0, 2, 1]).unwrap().depth(), 3);
        let cyclic: Vec<u16> = (0..64).map(|i| ((i + 1) % 64) as u16).collect();
        let network = BenesNetwork::compile(&cyclic).unwrap();
        assert_eq!(network.depth(), 11);
        assert_eq!(network.shifts()[0], 32);
        assert_eq!(network.shifts()[5], 1);
    }

    #[test]
    fn swap_of_two_sites() {
        let network = BenesNetwork::compile(&[1, 0]).unwrap().to_small().unwrap();
        assert_eq!(network.apply(0b01), 0b10);
        assert_eq!(network.apply(0b11), 0b11);
    }

    #[test]
    fn cyclic_shift_moves_bits_up() {
        let network = BenesNetwork::compile(&[1, 2, 3, 0]).unwrap().to_small().unwrap();
        assert_eq!(network.apply(0b0001), 0b0010);
        assert_eq!(network.apply(0b1000), 0b0001);
        assert_eq!(network.apply(0b0110), 0b1100);
    }

    #[test]
    fn wide_networks_do_not_narrow() {
        let identity: Vec<u16> = (0..100).collect();
        let network = BenesNetwork::compile(&identity).unwrap();
        assert!(network.to_small().is_err());
        assert_eq!(network.to_big().depth(), network.depth());
    }
}
