use embrya_core::models::comprehensive::QualityBand;
use embrya_core::models::embryo::{EmbryoFeatures, EmbryoResult, ProcessingStatus};
use embrya_core::models::overrides::{ClinicalOverride, GardnerGrade, OverrideReason};
use embrya_core::models::patient::Patient;
use uuid::Uuid;

fn sample_embryo() -> EmbryoResult {
    EmbryoResult {
        id: Uuid::new_v4(),
        name: "EMB-001".to_string(),
        image_url: "data:image/png;base64,AAAA".to_string(),
        viability_score: 87.0,
        rank: 1,
        features: EmbryoFeatures {
            developmental_stage: "Day 5 Blastocyst".to_string(),
            symmetry: QualityBand::Excellent,
            fragmentation: "<5% (Minimal)".to_string(),
            blastocyst_expansion: Some("Grade 4 (Expanded)".to_string()),
            inner_cell_mass: Some("Grade A".to_string()),
            trophectoderm: Some("Grade A".to_string()),
        },
        key_findings: vec!["Optimal developmental progression observed".to_string()],
        recommendation: "Excellent candidate for transfer.".to_string(),
        patient_id: Some(Uuid::new_v4()),
        development_day: Some(5),
        comprehensive_analysis: None,
        is_selected: true,
        manual_grade: Some(GardnerGrade::Grade4AA),
        override_score: Some(82.0),
        override_reason: Some(OverrideReason::Morphology),
        notes: None,
        uploaded_at: Some("2026-02-01T09:00:00Z".parse().unwrap()),
        processing_status: ProcessingStatus::Completed,
    }
}

#[test]
fn embryo_serializes_with_the_dashboard_field_names() {
    let value = serde_json::to_value(sample_embryo()).unwrap();
    let object = value.as_object().unwrap();

    for key in [
        "imageUrl",
        "viabilityScore",
        "keyFindings",
        "patientId",
        "developmentDay",
        "isSelected",
        "manualGrade",
        "overrideScore",
        "overrideReason",
        "processingStatus",
    ] {
        assert!(object.contains_key(key), "missing key {key}");
    }

    assert_eq!(value["manualGrade"], "4AA");
    assert_eq!(value["overrideReason"], "morphology");
    assert_eq!(value["processingStatus"], "completed");
    assert_eq!(value["features"]["symmetry"], "Excellent");
    // Absent optionals are omitted, not serialized as null.
    assert!(!object.contains_key("notes"));
}

#[test]
fn embryo_round_trips_through_json() {
    let embryo = sample_embryo();
    let json = serde_json::to_string(&embryo).unwrap();
    let back: EmbryoResult = serde_json::from_str(&json).unwrap();

    assert_eq!(back.id, embryo.id);
    assert_eq!(back.viability_score, 87.0);
    assert_eq!(back.effective_score(), 82.0);
    assert_eq!(back.manual_grade, Some(GardnerGrade::Grade4AA));
    assert_eq!(back.uploaded_at, embryo.uploaded_at);
}

#[test]
fn patient_keeps_its_mixed_wire_casing() {
    let patient = Patient {
        id: Uuid::new_v4(),
        name: "Jordan Avery".to_string(),
        cycle_number: 3,
        created_at: "2026-02-01T09:00:00Z".parse().unwrap(),
        age: Some(36),
        audit_code: Some("PT-2026-0124".to_string()),
        assigned_doctor: Some("Dr. Osei".to_string()),
        contact_number: None,
        email: None,
        notes: None,
    };

    let value = serde_json::to_value(&patient).unwrap();
    let object = value.as_object().unwrap();
    // Dashboard-era fields are camelCase; backend-sourced identifiers
    // stayed snake_case on the wire.
    assert!(object.contains_key("cycleNumber"));
    assert!(object.contains_key("createdAt"));
    assert!(object.contains_key("audit_code"));
    assert!(object.contains_key("assigned_doctor"));
}

#[test]
fn override_emptiness_ignores_whitespace_notes() {
    assert!(ClinicalOverride::default().is_empty());
    assert!(ClinicalOverride {
        notes: Some("  ".to_string()),
        ..Default::default()
    }
    .is_empty());
    assert!(!ClinicalOverride {
        manual_grade: Some(GardnerGrade::Grade2CC),
        ..Default::default()
    }
    .is_empty());
}
