use embrya_analysis::validate::{validate_override, OverrideValidationError};
use embrya_core::models::overrides::{ClinicalOverride, GardnerGrade, OverrideReason};

#[test]
fn score_without_reason_is_rejected() {
    let draft = ClinicalOverride {
        override_score: Some(62.0),
        ..Default::default()
    };
    assert_eq!(
        validate_override(&draft),
        Err(OverrideValidationError::MissingReason)
    );
}

#[test]
fn empty_submission_is_rejected() {
    assert_eq!(
        validate_override(&ClinicalOverride::default()),
        Err(OverrideValidationError::EmptySubmission)
    );

    // Whitespace-only notes do not count as content.
    let draft = ClinicalOverride {
        notes: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(
        validate_override(&draft),
        Err(OverrideValidationError::EmptySubmission)
    );
}

#[test]
fn out_of_range_score_is_rejected() {
    for value in [-1.0, 100.5, f64::NAN] {
        let draft = ClinicalOverride {
            override_score: Some(value),
            override_reason: Some(OverrideReason::Morphology),
            ..Default::default()
        };
        assert!(matches!(
            validate_override(&draft),
            Err(OverrideValidationError::ScoreOutOfRange { .. })
        ));
    }
}

#[test]
fn score_with_reason_is_accepted() {
    let draft = ClinicalOverride {
        override_score: Some(45.0),
        override_reason: Some(OverrideReason::Technical),
        ..Default::default()
    };
    assert_eq!(validate_override(&draft), Ok(()));
}

#[test]
fn single_field_submissions_are_accepted() {
    let grade_only = ClinicalOverride {
        manual_grade: Some(GardnerGrade::Grade4AA),
        ..Default::default()
    };
    assert_eq!(validate_override(&grade_only), Ok(()));

    let notes_only = ClinicalOverride {
        notes: Some("Uneven blastomere sizes at the 8-cell stage.".to_string()),
        ..Default::default()
    };
    assert_eq!(validate_override(&notes_only), Ok(()));

    // A reason on its own is a valid (if unusual) submission.
    let reason_only = ClinicalOverride {
        override_reason: Some(OverrideReason::Clinical),
        ..Default::default()
    };
    assert_eq!(validate_override(&reason_only), Ok(()));
}

#[test]
fn grade_and_reason_round_trip_their_wire_labels() {
    let grade: GardnerGrade = serde_json::from_str("\"4AA\"").unwrap();
    assert_eq!(grade, GardnerGrade::Grade4AA);
    assert_eq!(serde_json::to_string(&grade).unwrap(), "\"4AA\"");
    assert_eq!("3BB".parse::<GardnerGrade>().unwrap(), GardnerGrade::Grade3BB);
    assert!("6ZZ".parse::<GardnerGrade>().is_err());

    let reason: OverrideReason = serde_json::from_str("\"morphology\"").unwrap();
    assert_eq!(reason, OverrideReason::Morphology);
    assert_eq!(reason.label(), "Morphological Anomaly");
    assert!("vibes".parse::<OverrideReason>().is_err());
}
