use embrya_analysis::ranking::assign_ranks;
use embrya_core::models::comprehensive::QualityBand;
use embrya_core::models::embryo::{EmbryoFeatures, EmbryoResult, ProcessingStatus};
use uuid::Uuid;

fn embryo(name: &str, score: f64) -> EmbryoResult {
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
        patient_id: None,
        development_day: None,
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

fn ranks_by_name<'a>(embryos: &'a [EmbryoResult]) -> Vec<(&'a str, u32)> {
    embryos.iter().map(|e| (e.name.as_str(), e.rank)).collect()
}

#[test]
fn adding_a_top_scorer_shifts_existing_ranks() {
    let mut embryos = vec![embryo("EMB-001", 80.0), embryo("EMB-002", 60.0)];
    assign_ranks(&mut embryos);
    assert_eq!(ranks_by_name(&embryos), vec![("EMB-001", 1), ("EMB-002", 2)]);

    embryos.push(embryo("EMB-003", 95.0));
    assign_ranks(&mut embryos);
    assert_eq!(
        ranks_by_name(&embryos),
        vec![("EMB-001", 2), ("EMB-002", 3), ("EMB-003", 1)]
    );
}

#[test]
fn ranks_cover_one_through_n_without_gaps() {
    let scores = [55.0, 91.0, 12.0, 74.5, 74.5, 33.0, 91.0];
    let mut embryos: Vec<EmbryoResult> = scores
        .iter()
        .enumerate()
        .map(|(i, &s)| embryo(&format!("EMB-{i:03}"), s))
        .collect();
    assign_ranks(&mut embryos);

    let mut ranks: Vec<u32> = embryos.iter().map(|e| e.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=scores.len() as u32).collect::<Vec<_>>());

    let mut sorted = embryos.clone();
    sorted.sort_by(|a, b| b.viability_score.partial_cmp(&a.viability_score).unwrap());
    for (index, e) in sorted.iter().enumerate() {
        assert_eq!(e.rank, index as u32 + 1);
    }
}

#[test]
fn ties_keep_insertion_order() {
    let mut embryos = vec![
        embryo("first", 70.0),
        embryo("second", 70.0),
        embryo("third", 70.0),
    ];
    assign_ranks(&mut embryos);
    assert_eq!(
        ranks_by_name(&embryos),
        vec![("first", 1), ("second", 2), ("third", 3)]
    );
}

#[test]
fn empty_collection_is_a_no_op() {
    let mut embryos: Vec<EmbryoResult> = Vec::new();
    assign_ranks(&mut embryos);
    assert!(embryos.is_empty());
}
