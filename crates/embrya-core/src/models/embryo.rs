use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::comprehensive::{ComprehensivePrediction, QualityBand};
use super::overrides::{GardnerGrade, OverrideReason};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ProcessingStatus {
    #[default]
    Pending,
    Processing,
    Completed,
}

/// Compact summary block shown in the gallery and quoted in reports.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmbryoFeatures {
    pub developmental_stage: String,
    pub symmetry: QualityBand,
    pub fragmentation: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub blastocyst_expansion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inner_cell_mass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trophectoderm: Option<String>,
}

/// One analyzed embryo as the dashboard sees it.
///
/// The embedded `comprehensive_analysis` is immutable once set; the
/// clinician override fields live alongside it and take precedence in
/// display via [`EmbryoResult::effective_score`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmbryoResult {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub viability_score: f64,
    /// 1-based, globally consistent within a patient's collection.
    pub rank: u32,
    pub features: EmbryoFeatures,
    pub key_findings: Vec<String>,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub patient_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub development_day: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comprehensive_analysis: Option<ComprehensivePrediction>,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub manual_grade: Option<GardnerGrade>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub override_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub override_reason: Option<OverrideReason>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uploaded_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub processing_status: ProcessingStatus,
}

impl EmbryoResult {
    /// The score downstream display should quote: the clinician's
    /// override when present, otherwise the derived score.
    pub fn effective_score(&self) -> f64 {
        self.override_score.unwrap_or(self.viability_score)
    }

    pub fn has_override(&self) -> bool {
        self.override_score.is_some()
            || self.override_reason.is_some()
            || self.manual_grade.is_some()
            || self.notes.is_some()
    }
}
