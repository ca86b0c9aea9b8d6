use approx::assert_relative_eq;
use procmap_core::{ArtifactResult, ProcMapError, ReferenceContext};
use procmap_insight::{
    coverage_percentage, format_percentage, summarize_artifacts, total_affected_cases,
};

fn artifact(name: &str, affected: u64) -> ArtifactResult {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "numAffectedCases": affected,
        "conditions": [{"type": "activity", "activities": ["Rework"]}],
        "type": "rework"
    }))
    .unwrap()
}

#[test]
fn test_total_affected_cases() {
    let artifacts = vec![artifact("rework", 12), artifact("skipped approval", 30)];
    assert_eq!(total_affected_cases(&artifacts), 42);
    assert_eq!(total_affected_cases(&[]), 0);
}

#[test]
fn test_coverage_percentage() {
    let context = ReferenceContext::new(400);
    assert_relative_eq!(coverage_percentage(30, &context).unwrap(), 7.5);
    assert!(matches!(
        coverage_percentage(30, &ReferenceContext::new(0)),
        Err(ProcMapError::InvalidContext(_))
    ));
}

#[test]
fn test_format_percentage_rounds() {
    assert_eq!(format_percentage(42.4), "42%");
    assert_eq!(format_percentage(42.6), "43%");
    assert_eq!(format_percentage(0.0), "0%");
}

#[test]
fn test_format_percentage_non_finite() {
    assert_eq!(format_percentage(f64::NAN), "n/a");
    assert_eq!(format_percentage(f64::INFINITY), "n/a");
    assert_eq!(format_percentage(f64::NEG_INFINITY), "n/a");
}

#[test]
fn test_empty_artifacts_with_zero_population_rejected() {
    let err = summarize_artifacts(&[], &ReferenceContext::new(0)).unwrap_err();
    assert!(matches!(err, ProcMapError::InvalidContext(_)));

    let err = summarize_artifacts(&[], &ReferenceContext::new(-1)).unwrap_err();
    assert!(matches!(err, ProcMapError::InvalidContext(_)));

    assert!(summarize_artifacts(&[], &ReferenceContext::new(5))
        .unwrap()
        .is_empty());
}

#[test]
fn test_summaries_keep_input_order() {
    let context = ReferenceContext::new(200);
    let artifacts = vec![artifact("rework", 50), artifact("loop", 1)];
    let summaries = summarize_artifacts(&artifacts, &context).unwrap();

    assert_eq!(summaries[0].name, "rework");
    assert_eq!(summaries[0].coverage_label(), "25%");
    assert_eq!(summaries[1].coverage_label(), "1%");
    assert_eq!(artifacts[0].details["type"], "rework");
}
