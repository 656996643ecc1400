use lsym_core::LsError;
use lsym_group::{from_json_slice, to_canonical_json_bytes, GeneratorSet, GroupSummary};

#[test]
fn generator_set_defaults() {
    let set: GeneratorSet = from_json_slice(
        br#"{"number_of_sites": 4, "generators": [{"permutation": [1, 2, 3, 0]}]}"#,
    )
    .unwrap();
    assert_eq!(set.spin_inversion, 0);
    assert_eq!(set.generators[0].sector, 0);
    let group = set.build_group().unwrap();
    assert_eq!(group.len(), 4);
}

#[test]
fn missing_generators_give_trivial_group() {
    let set: GeneratorSet = from_json_slice(br#"{"number_of_sites": 6}"#).unwrap();
    let group = set.build_group().unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group.number_of_sites(), Some(6));
}

#[test]
fn generator_length_must_match_number_of_sites() {
    let set: GeneratorSet = from_json_slice(
        br#"{"number_of_sites": 5, "generators": [{"permutation": [1, 0], "sector": 1}]}"#,
    )
    .unwrap();
    assert!(matches!(
        set.build_group(),
        Err(LsError::InvalidNumberOfSites(_))
    ));
}

#[test]
fn summary_is_canonical_json() {
    let set: GeneratorSet = from_json_slice(
        br#"{"number_of_sites": 3, "spin_inversion": -1,
             "generators": [{"permutation": [1, 2, 0], "sector": 1}]}"#,
    )
    .unwrap();
    let summary = set.build_group().unwrap().summary();
    assert_eq!(summary.size, 3);
    assert_eq!(summary.network_depth, Some(3));
    let bytes = to_canonical_json_bytes(&summary).unwrap();
    assert!(bytes.starts_with(br#"{"elements":[{"eigenvalue":"#));
    let restored: GroupSummary = from_json_slice(&bytes).unwrap();
    assert_eq!(restored.size, summary.size);
    for (left, right) in restored.elements.iter().zip(&summary.elements) {
        assert_eq!(left.permutation, right.permutation);
        assert_eq!((left.sector, left.periodicity), (right.sector, right.periodicity));
        assert!((left.eigenvalue[0] - right.eigenvalue[0]).abs() < 1e-12);
        assert!((left.eigenvalue[1] - right.eigenvalue[1]).abs() < 1e-12);
    }
}

#[test]
fn malformed_json_is_a_serde_error() {
    let result: Result<GeneratorSet, _> = from_json_slice(b"{\"number_of_sites\": }");
    assert!(matches!(result, Err(LsError::Serde(_))));
}
