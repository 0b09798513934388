//! Legacy summary derivations for the gallery cards and report artifacts.
//!
//! These condense the comprehensive record into the compact block the
//! first-generation dashboard panels render: a short feature summary,
//! four key findings, and a one-sentence recommendation.

use embrya_core::models::comprehensive::ComprehensivePrediction;
use embrya_core::models::embryo::EmbryoFeatures;

/// Build the compact feature summary from a derived prediction.
///
/// The blastocyst sub-grades only appear from the blastocyst band upward;
/// cleavage-stage embryos carry the three base fields alone.
pub fn summary_block(analysis: &ComprehensivePrediction) -> EmbryoFeatures {
    let score = analysis.viability_score;
    let is_blastocyst = score >= 60.0;
    let grading = &analysis.blastocyst_grading;

    EmbryoFeatures {
        developmental_stage: analysis
            .morphokinetics
            .estimated_developmental_stage
            .clone(),
        symmetry: analysis.morphological_analysis.cell_symmetry,
        fragmentation: fragmentation_summary(
            analysis.morphological_analysis.fragmentation_percentage,
        ),
        blastocyst_expansion: is_blastocyst.then(|| {
            format!(
                "Grade {} ({})",
                grading.expansion_stage,
                expansion_word(grading.expansion_stage)
            )
        }),
        inner_cell_mass: is_blastocyst.then(|| format!("Grade {}", grading.inner_cell_mass_grade)),
        trophectoderm: is_blastocyst.then(|| format!("Grade {}", grading.trophectoderm_grade)),
    }
}

fn fragmentation_summary(percentage: f64) -> String {
    if percentage < 5.0 {
        "<5% (Minimal)".to_string()
    } else if percentage < 10.0 {
        "5-10% (Low)".to_string()
    } else if percentage < 25.0 {
        "10-20% (Moderate)".to_string()
    } else {
        ">25% (High)".to_string()
    }
}

fn expansion_word(stage: u8) -> &'static str {
    match stage {
        1 => "Early",
        2 => "Partial",
        3 => "Full",
        4 => "Expanded",
        5 => "Hatching",
        _ => "Hatched",
    }
}

/// Band-driven key findings, four per viability band.
pub fn key_findings(score: f64) -> Vec<String> {
    let findings: [&str; 4] = if score >= 80.0 {
        [
            "Optimal developmental progression observed",
            "Excellent morphological characteristics",
            "Minimal fragmentation indicates healthy division",
            "Strong predictive markers for implantation",
        ]
    } else if score >= 70.0 {
        [
            "Good developmental stage for transfer",
            "Well-formed cellular structure",
            "Acceptable fragmentation levels",
            "Positive indicators for viability",
        ]
    } else if score >= 50.0 {
        [
            "Adequate developmental progression",
            "Moderate morphological quality",
            "Some fragmentation present but acceptable",
            "May benefit from extended culture",
        ]
    } else {
        [
            "Suboptimal developmental characteristics",
            "Concerns with cellular organization",
            "Elevated fragmentation levels observed",
            "Limited implantation potential",
        ]
    };
    findings.iter().map(|f| f.to_string()).collect()
}

/// One-sentence recommendation for the gallery card.
pub fn recommendation(score: f64) -> String {
    if score >= 80.0 {
        "Excellent candidate for transfer. Highest priority for fresh or frozen embryo \
         transfer based on clinical protocol."
            .to_string()
    } else if score >= 70.0 {
        "Good candidate for transfer. Consider for fresh transfer or cryopreservation \
         depending on patient factors."
            .to_string()
    } else if score >= 50.0 {
        "Moderate quality. May be suitable for transfer if higher-graded embryos unavailable."
            .to_string()
    } else {
        "Lower viability potential. Consider extended culture or discuss alternative options \
         with patient."
            .to_string()
    }
}
