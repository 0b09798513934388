//! The fully-derived prediction record consumed by every dashboard panel.
//!
//! A `ComprehensivePrediction` is created exactly once per analyzed image
//! and is immutable thereafter. Banded labels are closed enums, so a field
//! is never left undefined, whatever the backend sent.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::prediction::ModelPrediction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Viability {
    Good,
    NotGood,
}

impl fmt::Display for Viability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Viability::Good => "good",
            Viability::NotGood => "not_good",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        })
    }
}

/// Gardner letter grade for ICM and trophectoderm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GardnerLetter {
    A,
    B,
    C,
}

impl fmt::Display for GardnerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GardnerLetter::A => "A",
            GardnerLetter::B => "B",
            GardnerLetter::C => "C",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Consistency {
    Low,
    Moderate,
    High,
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Consistency::Low => "Low",
            Consistency::Moderate => "Moderate",
            Consistency::High => "High",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Uncertainty {
    Low,
    Medium,
}

impl fmt::Display for Uncertainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Uncertainty::Low => "Low",
            Uncertainty::Medium => "Medium",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Severity {
    Low,
    Moderate,
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FragmentationLevel {
    Minimal,
    Low,
    Moderate,
    High,
}

impl fmt::Display for FragmentationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FragmentationLevel::Minimal => "Minimal",
            FragmentationLevel::Low => "Low",
            FragmentationLevel::Moderate => "Moderate",
            FragmentationLevel::High => "High",
        })
    }
}

/// Four-step qualitative band used for circularity grade and cell symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum QualityBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for QualityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityBand::Excellent => "Excellent",
            QualityBand::Good => "Good",
            QualityBand::Fair => "Fair",
            QualityBand::Poor => "Poor",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MorphologicalAnalysis {
    pub fragmentation_level: FragmentationLevel,
    pub fragmentation_percentage: f64,
    pub circularity_score: f64,
    pub circularity_grade: QualityBand,
    pub boundary_definition: String,
    pub cell_symmetry: QualityBand,
    /// Micrometres.
    pub zona_pellucida_thickness: f64,
    pub zona_pellucida_integrity: String,
    pub cytoplasmic_granularity: String,
    pub vacuolization: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BlastocystGrading {
    /// Gardner expansion stage, 1–6.
    pub expansion_stage: u8,
    pub expansion_description: String,
    pub inner_cell_mass_grade: GardnerLetter,
    pub trophectoderm_grade: GardnerLetter,
    /// e.g. "4AA". The letter suffix is banded on viability alone and is
    /// intentionally independent of the ICM/TE letters above.
    pub overall_grade: String,
    pub quality_assessment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Morphokinetics {
    pub estimated_developmental_stage: String,
    pub timing_assessment: String,
    pub predicted_day: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeneticRisk {
    pub chromosomal_risk_level: RiskLevel,
    /// 0–100.
    pub aneuploidy_risk_score: f64,
    pub pgt_a_recommendation: String,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalRecommendation {
    pub transfer_recommendation: String,
    /// 1 is most urgent, 5 least.
    pub transfer_priority: u8,
    pub freeze_recommendation: bool,
    pub discard_recommendation: bool,
    pub reasoning: Vec<String>,
    pub clinical_notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeatureContribution {
    pub feature: String,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeatureConcern {
    pub feature: String,
    pub concern_level: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Explainability {
    pub feature_importance: BTreeMap<String, f64>,
    pub top_positive_features: Vec<FeatureContribution>,
    pub top_negative_features: Vec<FeatureConcern>,
    pub decision_factors: Vec<String>,
    pub confidence_explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QualityMetrics {
    /// Mean predicted-good probability across the ensemble, 0–1.
    pub agreement_rate: f64,
    pub prediction_consistency: Consistency,
    pub model_confidence_scores: Vec<f64>,
    pub uncertainty_level: Uncertainty,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AbnormalityFlags {
    pub has_abnormalities: bool,
    pub abnormality_types: Vec<String>,
    pub severity: Severity,
    pub requires_manual_review: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComprehensivePrediction {
    pub prediction: Viability,
    /// 0–100.
    pub viability_score: f64,
    /// 0–1.
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub model_predictions: Vec<ModelPrediction>,
    /// Raw morphological measurements, passed through verbatim.
    pub features: BTreeMap<String, f64>,
    pub morphological_analysis: MorphologicalAnalysis,
    pub blastocyst_grading: BlastocystGrading,
    pub morphokinetics: Morphokinetics,
    pub genetic_risk: GeneticRisk,
    pub clinical_recommendation: ClinicalRecommendation,
    pub explainability: Explainability,
    pub quality_metrics: QualityMetrics,
    pub abnormality_flags: AbnormalityFlags,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confusion_matrix: Option<serde_json::Value>,
    pub analysis_timestamp: String,
    pub processing_time_ms: f64,
}
