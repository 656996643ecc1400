use lsym_core::errors::{ErrorInfo, LsError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("sites", "4")
        .with_context("reason", "example")
}

#[test]
fn incompatible_error_surface() {
    let err = LsError::IncompatibleSymmetries(sample_info("compose-periodicity", "2 vs 3"));
    assert_eq!(err.info().code, "compose-periodicity");
    assert!(err.info().context.contains_key("sites"));
    assert!(err.to_string().starts_with("incompatible symmetries"));
}

#[test]
fn number_of_sites_error_surface() {
    let err = LsError::InvalidNumberOfSites(sample_info("zero-sites", "need at least one site"));
    assert_eq!(err.info().code, "zero-sites");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = LsError::InvalidSector(
        ErrorInfo::new("sector-range", "sector out of range")
            .with_context("sector", "5")
            .with_hint("use a sector below the periodicity"),
    );
    let text = err.to_string();
    assert!(text.contains("sector=5"));
    assert!(text.contains("hint: use a sector below the periodicity"));
}

#[test]
fn errors_round_trip_json() {
    let err = LsError::System(sample_info("dump-empty", "group is empty"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"System\""));
    let decoded: LsError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
