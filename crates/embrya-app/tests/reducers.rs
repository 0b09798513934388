use embrya_app::reducers::{
    apply_new_analysis, apply_override, select_best, select_patient, ReduceError,
};
use embrya_app::state::AppState;
use embrya_core::models::comprehensive::QualityBand;
use embrya_core::models::embryo::{EmbryoFeatures, EmbryoResult, ProcessingStatus};
use embrya_core::models::overrides::{ClinicalOverride, GardnerGrade, OverrideReason};
use embrya_core::models::patient::Patient;
use uuid::Uuid;

fn patient(name: &str) -> Patient {
    Patient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        cycle_number: 1,
        created_at: "2026-02-01T09:00:00Z".parse().unwrap(),
        age: None,
        audit_code: None,
        assigned_doctor: None,
        contact_number: None,
        email: None,
        notes: None,
    }
}

fn embryo(name: &str, score: f64, patient_id: Uuid) -> EmbryoResult {
    EmbryoResult {
        id: Uuid::new_v4(),
        name: name.to_string(),
        image_url: String::new(),
        viability_score: score,
        rank: 0,
        features: EmbryoFeatures {
            developmental_stage: "Day 5 Blastocyst".to_string(),
            symmetry: QualityBand::Good,
            fragmentation: "<5% (Minimal)".to_string(),
            blastocyst_expansion: None,
            inner_cell_mass: None,
            trophectoderm: None,
        },
        key_findings: Vec::new(),
        recommendation: String::new(),
        patient_id: Some(patient_id),
        development_day: Some(5),
        comprehensive_analysis: None,
        is_selected: false,
        manual_grade: None,
        override_score: None,
        override_reason: None,
        notes: None,
        uploaded_at: None,
        processing_status: ProcessingStatus::Completed,
    }
}

fn rank_of(state: &AppState, name: &str) -> u32 {
    state
        .embryos
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.rank)
        .unwrap()
}

#[test]
fn new_analysis_reranks_only_its_patient() {
    let mut state = AppState::default();
    let alice = patient("Alice");
    let brook = patient("Brook");
    let alice_id = alice.id;
    let brook_id = brook.id;
    state.patients = vec![alice, brook];

    apply_new_analysis(&mut state, embryo("A-1", 80.0, alice_id));
    apply_new_analysis(&mut state, embryo("A-2", 60.0, alice_id));
    apply_new_analysis(&mut state, embryo("B-1", 90.0, brook_id));
    assert_eq!(rank_of(&state, "A-1"), 1);
    assert_eq!(rank_of(&state, "A-2"), 2);
    assert_eq!(rank_of(&state, "B-1"), 1);

    // A new top scorer for Alice shifts her collection, not Brook's.
    apply_new_analysis(&mut state, embryo("A-3", 95.0, alice_id));
    assert_eq!(rank_of(&state, "A-3"), 1);
    assert_eq!(rank_of(&state, "A-1"), 2);
    assert_eq!(rank_of(&state, "A-2"), 3);
    assert_eq!(rank_of(&state, "B-1"), 1);
}

#[test]
fn override_replaces_fields_and_keeps_derived_score() {
    let mut state = AppState::default();
    let p = patient("Alice");
    let patient_id = p.id;
    state.patients = vec![p];
    let e = embryo("A-1", 82.0, patient_id);
    let embryo_id = e.id;
    apply_new_analysis(&mut state, e);

    let draft = ClinicalOverride {
        override_score: Some(64.0),
        override_reason: Some(OverrideReason::Development),
        manual_grade: Some(GardnerGrade::Grade3BB),
        notes: Some("Compaction slower than expected.".to_string()),
    };
    apply_override(&mut state, embryo_id, &draft).unwrap();

    let updated = state.embryo(embryo_id).unwrap();
    assert_eq!(updated.override_score, Some(64.0));
    assert_eq!(updated.override_reason, Some(OverrideReason::Development));
    assert_eq!(updated.manual_grade, Some(GardnerGrade::Grade3BB));
    // Derived score is retained for audit; display precedence flips.
    assert_eq!(updated.viability_score, 82.0);
    assert_eq!(updated.effective_score(), 64.0);
}

#[test]
fn invalid_override_leaves_state_untouched() {
    let mut state = AppState::default();
    let p = patient("Alice");
    let patient_id = p.id;
    state.patients = vec![p];
    let e = embryo("A-1", 82.0, patient_id);
    let embryo_id = e.id;
    apply_new_analysis(&mut state, e);

    let draft = ClinicalOverride {
        override_score: Some(64.0),
        ..Default::default()
    };
    let result = apply_override(&mut state, embryo_id, &draft);
    assert!(matches!(result, Err(ReduceError::InvalidOverride(_))));
    assert_eq!(state.embryo(embryo_id).unwrap().override_score, None);
}

#[test]
fn override_on_unknown_embryo_errors() {
    let mut state = AppState::default();
    let draft = ClinicalOverride {
        notes: Some("note".to_string()),
        ..Default::default()
    };
    let missing = Uuid::new_v4();
    assert_eq!(
        apply_override(&mut state, missing, &draft),
        Err(ReduceError::UnknownEmbryo(missing))
    );
}

#[test]
fn select_patient_requires_a_known_id() {
    let mut state = AppState::default();
    let p = patient("Alice");
    let id = p.id;
    state.patients = vec![p];

    select_patient(&mut state, Some(id)).unwrap();
    assert_eq!(state.active_patient_id, Some(id));
    assert_eq!(state.active_patient().unwrap().name, "Alice");

    let missing = Uuid::new_v4();
    assert_eq!(
        select_patient(&mut state, Some(missing)),
        Err(ReduceError::UnknownPatient(missing))
    );

    select_patient(&mut state, None).unwrap();
    assert!(state.active_patient_id.is_none());
}

#[test]
fn select_best_clears_siblings() {
    let mut state = AppState::default();
    let p = patient("Alice");
    let patient_id = p.id;
    state.patients = vec![p];
    let first = embryo("A-1", 80.0, patient_id);
    let second = embryo("A-2", 70.0, patient_id);
    let first_id = first.id;
    let second_id = second.id;
    apply_new_analysis(&mut state, first);
    apply_new_analysis(&mut state, second);

    select_best(&mut state, first_id).unwrap();
    assert!(state.embryo(first_id).unwrap().is_selected);
    assert!(!state.embryo(second_id).unwrap().is_selected);

    select_best(&mut state, second_id).unwrap();
    assert!(!state.embryo(first_id).unwrap().is_selected);
    assert!(state.embryo(second_id).unwrap().is_selected);
}
