use lsym_core::{Bits512, RngHandle};
use lsym_group::{
    BigSymmetry, CompiledSymmetry, DumpMasks, Group, SmallSymmetry, Symmetry, SymmetryPayload,
};
use lsym_perm::{BigNetwork, SmallNetwork};
use num_complex::Complex64;

fn translation(sites: usize) -> Vec<u16> {
    (0..sites).map(|i| ((i + 1) % sites) as u16).collect()
}

#[test]
fn small_dump_is_row_major_by_stage() {
    let group = Group::new(&[Symmetry::new(translation(4), 1).unwrap()]).unwrap();
    let dump = group.dump_symmetry_info().unwrap();
    let depth = group.network_depth().unwrap();
    assert_eq!(dump.shifts, vec![2, 1, 2]);
    assert_eq!(dump.eigenvalues.len(), group.len());
    let DumpMasks::Small(masks) = &dump.masks else {
        panic!("expected single-word masks");
    };
    assert_eq!(masks.len(), depth * group.len());
    let mut rng = RngHandle::from_seed(7);
    for (index, symmetry) in group.symmetries().iter().enumerate() {
        assert_eq!(dump.eigenvalues[index], symmetry.eigenvalue());
        let network = SmallNetwork {
            number_of_sites: 4,
            masks: (0..depth).map(|stage| masks[stage * group.len() + index]).collect(),
            shifts: dump.shifts.clone(),
        };
        for _ in 0..16 {
            let bits = rng.configuration_64(4);
            assert_eq!(Some(network.apply(bits)), symmetry.apply_64(bits));
        }
    }
}

#[test]
fn wide_dump_uses_eight_words_per_mask() {
    let group = Group::new(&[Symmetry::new(translation(80), 3).unwrap()]).unwrap();
    assert_eq!(group.len(), 80);
    assert_eq!(group.words_per_mask(), 8);
    let depth = group.network_depth().unwrap();
    assert_eq!(depth, 13);

    let mut flat = vec![0u64; depth * group.len() * 8];
    let mut shifts = vec![0u32; depth];
    let mut eigenvalues = vec![Complex64::new(0.0, 0.0); group.len()];
    group.dump_into(&mut flat, &mut shifts, &mut eigenvalues).unwrap();

    let dump = group.dump_symmetry_info().unwrap();
    let DumpMasks::Big(masks) = &dump.masks else {
        panic!("expected wide masks");
    };
    assert_eq!(masks.len(), depth * group.len());
    assert_eq!(&masks[5].words[..], &flat[40..48]);

    let mut rng = RngHandle::from_seed(11);
    let index = 17;
    let network = BigNetwork {
        number_of_sites: 80,
        masks: (0..depth).map(|stage| masks[stage * group.len() + index]).collect(),
        shifts: shifts.clone(),
    };
    let symmetry = &group.symmetries()[index];
    for _ in 0..8 {
        let bits: Bits512 = rng.configuration_512(80);
        assert_eq!(network.apply(&bits), symmetry.apply_512(&bits));
    }
}

#[test]
fn short_buffers_are_rejected() {
    let group = Group::trivial(3).unwrap();
    let mut masks = [0u64; 1];
    let mut shifts = [0u32; 3];
    let mut eigenvalues = [Complex64::new(0.0, 0.0); 1];
    assert!(group.dump_into(&mut masks, &mut shifts, &mut eigenvalues).is_err());
}

#[test]
fn mask_width_follows_element_payload() {
    let narrow = Group::new(&[Symmetry::new(translation(64), 0).unwrap()]).unwrap();
    assert_eq!(narrow.words_per_mask(), SmallSymmetry::WORDS_PER_MASK);
    let wide = Group::new(&[Symmetry::new(translation(65), 0).unwrap()]).unwrap();
    assert_eq!(wide.words_per_mask(), BigSymmetry::WORDS_PER_MASK);

    let depth = wide.network_depth().unwrap();
    let mut flat = vec![0u64; depth * wide.len() * BigSymmetry::WORDS_PER_MASK];
    let mut shifts = vec![0u32; depth];
    let mut eigenvalues = vec![Complex64::new(0.0, 0.0); wide.len()];
    wide.dump_into(&mut flat, &mut shifts, &mut eigenvalues).unwrap();
    let SymmetryPayload::Big(first) = wide.symmetries()[0].payload() else {
        panic!("expected a wide element");
    };
    assert_eq!(&shifts[..], first.network_shifts());
    for (index, symmetry) in wide.symmetries().iter().enumerate() {
        assert_eq!(eigenvalues[index], symmetry.eigenvalue());
    }
}
