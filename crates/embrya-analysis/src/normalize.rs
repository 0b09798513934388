//! Prediction normalization.
//!
//! `normalize` consumes whatever subset of fields the backend managed to
//! produce and derives the full record. It never fails: every missing or
//! malformed field has a fallback. The only impure input is the timestamp
//! stamped when the backend omitted one, which is why the pure core takes
//! `now` explicitly.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use embrya_core::models::comprehensive::{
    AbnormalityFlags, BlastocystGrading, ClinicalRecommendation, ComprehensivePrediction,
    ConfidenceLevel, Consistency, Explainability, FeatureConcern, FeatureContribution,
    FragmentationLevel, GardnerLetter, GeneticRisk, MorphologicalAnalysis, Morphokinetics,
    QualityBand, QualityMetrics, RiskLevel, Severity, Uncertainty, Viability,
};
use embrya_core::models::prediction::{ModelPrediction, RawPrediction};

/// Default zona pellucida thickness in µm when the backend measured none.
const DEFAULT_ZONA_THICKNESS_UM: f64 = 15.0;

/// Normalize a raw backend payload, stamping the current time when the
/// payload carries no `analysis_timestamp`.
pub fn normalize(raw: &RawPrediction, development_day: Option<u8>) -> ComprehensivePrediction {
    normalize_at(raw, development_day, jiff::Timestamp::now())
}

/// The pure core of [`normalize`]: identical `(raw, development_day, now)`
/// always yields an identical record.
pub fn normalize_at(
    raw: &RawPrediction,
    development_day: Option<u8>,
    now: jiff::Timestamp,
) -> ComprehensivePrediction {
    let features = raw.features.clone().unwrap_or_default();
    let importance = raw.feature_importance.clone().unwrap_or_default();
    let model_predictions = raw.model_predictions.clone().unwrap_or_default();

    let viability = raw
        .viability_score
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);
    let fragmentation = fragmentation_percentage(&features);
    let circularity = features
        .get("circularity_mean")
        .copied()
        .filter(|v| v.is_finite())
        .unwrap_or(0.3)
        .clamp(0.0, 1.0);
    let agreement = agreement_rate(&model_predictions);
    let confidence = raw
        .confidence
        .filter(|v| v.is_finite())
        .unwrap_or(agreement)
        .clamp(0.0, 1.0);

    let prediction = match raw.prediction.as_deref().map(str::to_ascii_lowercase) {
        Some(ref p) if p == "good" => Viability::Good,
        Some(ref p) if p == "not_good" => Viability::NotGood,
        _ if viability > 50.0 => Viability::Good,
        _ => Viability::NotGood,
    };

    let confidence_level = match raw.confidence_level.as_deref().map(str::to_ascii_lowercase) {
        Some(ref l) if l == "low" => ConfidenceLevel::Low,
        Some(ref l) if l == "medium" => ConfidenceLevel::Medium,
        Some(ref l) if l == "high" => ConfidenceLevel::High,
        _ => band_confidence(confidence),
    };

    let explainability = explainability(
        &importance,
        &features,
        viability,
        agreement,
        &model_predictions,
        confidence_level,
    );

    ComprehensivePrediction {
        prediction,
        viability_score: viability,
        confidence,
        confidence_level,
        morphological_analysis: morphological_analysis(
            viability,
            fragmentation,
            circularity,
            &features,
        ),
        blastocyst_grading: blastocyst_grading(viability, fragmentation, circularity),
        morphokinetics: morphokinetics(raw, development_day, viability),
        genetic_risk: genetic_risk(viability, fragmentation, circularity),
        clinical_recommendation: clinical_recommendation(viability),
        explainability,
        quality_metrics: quality_metrics(agreement, &model_predictions),
        abnormality_flags: abnormality_flags(viability, fragmentation),
        model_predictions,
        features,
        confusion_matrix: raw.confusion_matrix.clone(),
        analysis_timestamp: raw
            .analysis_timestamp
            .clone()
            .unwrap_or_else(|| now.to_string()),
        processing_time_ms: raw
            .processing_time_ms
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
    }
}

/// Fragmentation priority chain: explicit measurement, then region count,
/// then the circularity complement, then zero.
fn fragmentation_percentage(features: &BTreeMap<String, f64>) -> f64 {
    if let Some(explicit) = finite(features, "fragmentation_percentage") {
        return explicit.clamp(0.0, 100.0);
    }
    if let Some(regions) = finite(features, "num_regions_mean") {
        return (regions * 10.0).clamp(0.0, 100.0);
    }
    if let Some(circularity) = finite(features, "circularity_mean") {
        return ((1.0 - circularity) * 100.0).clamp(0.0, 100.0);
    }
    0.0
}

fn finite(features: &BTreeMap<String, f64>, key: &str) -> Option<f64> {
    features.get(key).copied().filter(|v| v.is_finite())
}

fn agreement_rate(predictions: &[ModelPrediction]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let sum: f64 = predictions
        .iter()
        .map(|p| p.probability_good.unwrap_or(0.0))
        .sum();
    (sum / predictions.len() as f64).clamp(0.0, 1.0)
}

fn band_confidence(confidence: f64) -> ConfidenceLevel {
    if confidence >= 0.8 {
        ConfidenceLevel::High
    } else if confidence >= 0.6 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

fn morphological_analysis(
    viability: f64,
    fragmentation: f64,
    circularity: f64,
    features: &BTreeMap<String, f64>,
) -> MorphologicalAnalysis {
    let fragmentation_level = if fragmentation < 5.0 {
        FragmentationLevel::Minimal
    } else if fragmentation < 10.0 {
        FragmentationLevel::Low
    } else if fragmentation < 25.0 {
        FragmentationLevel::Moderate
    } else {
        FragmentationLevel::High
    };

    let circularity_grade = if circularity >= 0.8 {
        QualityBand::Excellent
    } else if circularity >= 0.6 {
        QualityBand::Good
    } else if circularity >= 0.4 {
        QualityBand::Fair
    } else {
        QualityBand::Poor
    };

    let boundary_definition = if circularity >= 0.7 {
        "Well-defined"
    } else if circularity >= 0.4 {
        "Moderate"
    } else {
        "Poorly defined"
    };

    let cell_symmetry = if viability >= 80.0 {
        QualityBand::Excellent
    } else if viability >= 70.0 {
        QualityBand::Good
    } else if viability >= 50.0 {
        QualityBand::Fair
    } else {
        QualityBand::Poor
    };

    let zona_integrity = if viability >= 70.0 {
        "Intact"
    } else if viability >= 40.0 {
        "Minor irregularities"
    } else {
        "Compromised"
    };

    let granularity = if fragmentation < 10.0 {
        "Fine"
    } else if fragmentation < 30.0 {
        "Moderate"
    } else {
        "Coarse"
    };

    let vacuolization = if fragmentation < 20.0 {
        "None observed"
    } else if fragmentation < 50.0 {
        "Minor"
    } else {
        "Marked"
    };

    MorphologicalAnalysis {
        fragmentation_level,
        fragmentation_percentage: fragmentation,
        circularity_score: circularity,
        circularity_grade,
        boundary_definition: boundary_definition.to_string(),
        cell_symmetry,
        zona_pellucida_thickness: finite(features, "zona_pellucida_thickness")
            .unwrap_or(DEFAULT_ZONA_THICKNESS_UM),
        zona_pellucida_integrity: zona_integrity.to_string(),
        cytoplasmic_granularity: granularity.to_string(),
        vacuolization: vacuolization.to_string(),
    }
}

fn blastocyst_grading(viability: f64, fragmentation: f64, circularity: f64) -> BlastocystGrading {
    let expansion_stage = ((viability / 100.0 * 4.0).round() + 2.0).clamp(1.0, 6.0) as u8;

    let icm_score = viability * 0.6 + circularity * 100.0 * 0.4;
    let inner_cell_mass_grade = if icm_score >= 82.0 {
        GardnerLetter::A
    } else if icm_score >= 68.0 {
        GardnerLetter::B
    } else {
        GardnerLetter::C
    };

    let te_score = viability * 0.7 + (100.0 - fragmentation) * 0.3;
    let trophectoderm_grade = if te_score >= 80.0 {
        GardnerLetter::A
    } else if te_score >= 65.0 {
        GardnerLetter::B
    } else {
        GardnerLetter::C
    };

    // The suffix is banded on viability alone, disconnected from the ICM/TE
    // letters above. Preserved as-is.
    let grade_number = (viability / 100.0 * 6.0).round().clamp(1.0, 6.0) as u8;
    let suffix = if viability >= 80.0 {
        "AA"
    } else if viability >= 60.0 {
        "AB"
    } else {
        "BC"
    };

    let quality_assessment = if viability >= 80.0 {
        "Excellent quality"
    } else if viability >= 60.0 {
        "Good quality"
    } else if viability >= 40.0 {
        "Fair quality"
    } else {
        "Poor quality"
    };

    BlastocystGrading {
        expansion_stage,
        expansion_description: expansion_description(expansion_stage).to_string(),
        inner_cell_mass_grade,
        trophectoderm_grade,
        overall_grade: format!("{grade_number}{suffix}"),
        quality_assessment: quality_assessment.to_string(),
    }
}

fn expansion_description(stage: u8) -> &'static str {
    match stage {
        1 => "Early blastocyst, blastocoel less than half of embryo volume",
        2 => "Blastocyst, blastocoel half or more of embryo volume",
        3 => "Full blastocyst, blastocoel completely fills the embryo",
        4 => "Expanded blastocyst with thinning zona pellucida",
        5 => "Hatching blastocyst, trophectoderm herniating through the zona",
        _ => "Hatched blastocyst, fully escaped from the zona pellucida",
    }
}

fn morphokinetics(
    raw: &RawPrediction,
    development_day: Option<u8>,
    viability: f64,
) -> Morphokinetics {
    let raw_morpho = raw.morphokinetics.as_ref();

    let predicted_day = development_day
        .or_else(|| {
            raw_morpho
                .and_then(|m| m.predicted_day)
                .filter(|d| d.is_finite())
                .map(|d| d.round().clamp(0.0, 255.0) as u8)
        })
        .unwrap_or(5);

    let estimated_developmental_stage = raw_morpho
        .and_then(|m| m.estimated_developmental_stage.clone())
        .unwrap_or_else(|| stage_label(predicted_day));

    let timing_assessment = raw_morpho
        .and_then(|m| m.timing_assessment.clone())
        .unwrap_or_else(|| {
            if viability >= 70.0 {
                "On time".to_string()
            } else if viability >= 50.0 {
                "Borderline".to_string()
            } else {
                "Delayed".to_string()
            }
        });

    Morphokinetics {
        estimated_developmental_stage,
        timing_assessment,
        predicted_day,
    }
}

fn stage_label(day: u8) -> String {
    match day {
        1 => "Day 1 Pronuclear (2PN)".to_string(),
        2 => "Day 2 Cleavage (2-4 cell)".to_string(),
        3 => "Day 3 Cleavage (8 cell)".to_string(),
        4 => "Day 4 Morula".to_string(),
        5 => "Day 5 Blastocyst".to_string(),
        6 => "Day 6 Expanded Blastocyst".to_string(),
        other => format!("Day {other}"),
    }
}

fn genetic_risk(viability: f64, fragmentation: f64, circularity: f64) -> GeneticRisk {
    let chromosomal_risk_level = if viability >= 80.0 {
        RiskLevel::Low
    } else if viability >= 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    let mut risk_factors = Vec::new();
    if fragmentation > 30.0 {
        risk_factors.push("Elevated fragmentation".to_string());
    }
    if circularity < 0.5 {
        risk_factors.push("Irregular morphology".to_string());
    }
    if viability < 60.0 {
        risk_factors.push("Reduced viability prediction".to_string());
    }

    GeneticRisk {
        chromosomal_risk_level,
        aneuploidy_risk_score: (100.0 - viability.round()).clamp(0.0, 100.0),
        pgt_a_recommendation: if viability >= 80.0 {
            "Not required".to_string()
        } else {
            "Consider PGT-A".to_string()
        },
        risk_factors,
    }
}

/// Transfer banding by viability score, first match wins, descending.
fn clinical_recommendation(viability: f64) -> ClinicalRecommendation {
    if viability >= 85.0 {
        ClinicalRecommendation {
            transfer_recommendation: "Recommended for immediate transfer".to_string(),
            transfer_priority: 1,
            freeze_recommendation: false,
            discard_recommendation: false,
            reasoning: vec![
                format!("Viability score {viability:.0}/100 supports fresh transfer"),
                "Optimal developmental progression observed".to_string(),
                "Strong predictive markers for implantation".to_string(),
            ],
            clinical_notes: "Excellent candidate for transfer. Highest priority for fresh or \
                             frozen embryo transfer based on clinical protocol."
                .to_string(),
        }
    } else if viability >= 70.0 {
        ClinicalRecommendation {
            transfer_recommendation: "Consider for transfer".to_string(),
            transfer_priority: 2,
            freeze_recommendation: false,
            discard_recommendation: false,
            reasoning: vec![
                format!("Viability score {viability:.0}/100 within the transfer range"),
                "Well-formed cellular structure".to_string(),
                "Acceptable fragmentation levels".to_string(),
            ],
            clinical_notes: "Good candidate for transfer. Consider for fresh transfer or \
                             cryopreservation depending on patient factors."
                .to_string(),
        }
    } else if viability >= 50.0 {
        ClinicalRecommendation {
            transfer_recommendation: "Consider with caution".to_string(),
            transfer_priority: 3,
            freeze_recommendation: true,
            discard_recommendation: false,
            reasoning: vec![
                format!("Viability score {viability:.0}/100 is borderline"),
                "Moderate morphological quality".to_string(),
                "Some fragmentation present but acceptable".to_string(),
            ],
            clinical_notes: "Moderate quality. May be suitable for transfer if higher-graded \
                             embryos unavailable."
                .to_string(),
        }
    } else {
        ClinicalRecommendation {
            transfer_recommendation: "Not recommended for transfer".to_string(),
            transfer_priority: 5,
            freeze_recommendation: false,
            discard_recommendation: true,
            reasoning: vec![
                format!("Viability score {viability:.0}/100 below transfer threshold"),
                "Suboptimal developmental characteristics".to_string(),
                "Limited implantation potential".to_string(),
            ],
            clinical_notes: "Lower viability potential. Consider extended culture or discuss \
                             alternative options with patient."
                .to_string(),
        }
    }
}

fn explainability(
    importance: &BTreeMap<String, f64>,
    features: &BTreeMap<String, f64>,
    viability: f64,
    agreement: f64,
    predictions: &[ModelPrediction],
    confidence_level: ConfidenceLevel,
) -> Explainability {
    // Backend attributions carry sign; the features-only fallback does not,
    // so that path can never populate the negative list.
    let backend_attribution = !importance.is_empty();
    let source = if backend_attribution { importance } else { features };

    let mut ranked: Vec<(&str, f64)> = source
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(Ordering::Equal)
    });

    let top_positive_features: Vec<FeatureContribution> = ranked
        .iter()
        .filter(|(_, value)| !backend_attribution || *value >= 0.0)
        .take(5)
        .map(|(name, value)| FeatureContribution {
            feature: name.to_string(),
            contribution: value.abs(),
        })
        .collect();

    let top_negative_features: Vec<FeatureConcern> = if backend_attribution {
        ranked
            .iter()
            .filter(|(_, value)| *value < 0.0)
            .take(5)
            .map(|(name, value)| FeatureConcern {
                feature: name.to_string(),
                concern_level: value.abs(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut decision_factors = vec![format!("Ensemble viability score {viability:.0}/100")];
    if !predictions.is_empty() {
        decision_factors.push(format!("Model agreement {:.0}%", agreement * 100.0));
    }
    if let Some(top) = top_positive_features.first() {
        decision_factors.push(format!("Primary morphological driver: {}", top.feature));
    }

    let confidence_explanation = match confidence_level {
        ConfidenceLevel::High => "High confidence: ensemble models are in strong agreement",
        ConfidenceLevel::Medium => "Medium confidence: ensemble models mostly agree",
        ConfidenceLevel::Low => "Low confidence: ensemble models disagree; interpret with caution",
    };

    Explainability {
        feature_importance: source.clone(),
        top_positive_features,
        top_negative_features,
        decision_factors,
        confidence_explanation: confidence_explanation.to_string(),
    }
}

fn quality_metrics(agreement: f64, predictions: &[ModelPrediction]) -> QualityMetrics {
    QualityMetrics {
        agreement_rate: agreement,
        prediction_consistency: if agreement > 0.8 {
            Consistency::High
        } else if agreement > 0.6 {
            Consistency::Moderate
        } else {
            Consistency::Low
        },
        model_confidence_scores: predictions
            .iter()
            .map(|p| p.confidence.or(p.probability_good).unwrap_or(0.0))
            .collect(),
        uncertainty_level: if agreement > 0.75 {
            Uncertainty::Low
        } else {
            Uncertainty::Medium
        },
    }
}

fn abnormality_flags(viability: f64, fragmentation: f64) -> AbnormalityFlags {
    let viability_deficit = 100.0 - viability;
    let high_fragmentation = fragmentation > 70.0;
    let low_viability = viability_deficit > 60.0;

    let mut abnormality_types = Vec::new();
    if high_fragmentation {
        abnormality_types.push("High fragmentation".to_string());
    }
    if low_viability {
        abnormality_types.push("Low viability prediction".to_string());
    }

    let severity_basis = fragmentation.max(viability_deficit);
    let severity = if severity_basis > 80.0 {
        Severity::Severe
    } else if severity_basis > 60.0 {
        Severity::Moderate
    } else {
        Severity::Low
    };

    AbnormalityFlags {
        has_abnormalities: high_fragmentation || low_viability,
        abnormality_types,
        severity,
        requires_manual_review: high_fragmentation,
    }
}
