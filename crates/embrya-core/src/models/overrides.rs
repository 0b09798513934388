//! Clinician override vocabulary.
//!
//! An override is layered alongside the derived prediction; it never
//! mutates it. The derived score stays available for audit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Fixed set of accepted override justifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OverrideReason {
    Morphology,
    Development,
    Clinical,
    Technical,
}

impl OverrideReason {
    /// The label shown in the override form.
    pub fn label(&self) -> &'static str {
        match self {
            OverrideReason::Morphology => "Morphological Anomaly",
            OverrideReason::Development => "Developmental Delay",
            OverrideReason::Clinical => "Clinical History Factor",
            OverrideReason::Technical => "Image Quality Issue",
        }
    }
}

impl fmt::Display for OverrideReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverrideReason::Morphology => "morphology",
            OverrideReason::Development => "development",
            OverrideReason::Clinical => "clinical",
            OverrideReason::Technical => "technical",
        })
    }
}

impl FromStr for OverrideReason {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morphology" => Ok(OverrideReason::Morphology),
            "development" => Ok(OverrideReason::Development),
            "clinical" => Ok(OverrideReason::Clinical),
            "technical" => Ok(OverrideReason::Technical),
            other => Err(CoreError::InvalidValue {
                field: "override_reason",
                value: other.to_string(),
            }),
        }
    }
}

/// Fixed set of Gardner grades a clinician may assign manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GardnerGrade {
    #[serde(rename = "5AA")]
    Grade5AA,
    #[serde(rename = "4AA")]
    Grade4AA,
    #[serde(rename = "3BB")]
    Grade3BB,
    #[serde(rename = "2CC")]
    Grade2CC,
}

impl fmt::Display for GardnerGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GardnerGrade::Grade5AA => "5AA",
            GardnerGrade::Grade4AA => "4AA",
            GardnerGrade::Grade3BB => "3BB",
            GardnerGrade::Grade2CC => "2CC",
        })
    }
}

impl FromStr for GardnerGrade {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5AA" => Ok(GardnerGrade::Grade5AA),
            "4AA" => Ok(GardnerGrade::Grade4AA),
            "3BB" => Ok(GardnerGrade::Grade3BB),
            "2CC" => Ok(GardnerGrade::Grade2CC),
            other => Err(CoreError::InvalidValue {
                field: "manual_grade",
                value: other.to_string(),
            }),
        }
    }
}

/// A clinician's override submission, as entered in the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClinicalOverride {
    /// 0–100; requires `override_reason` when set.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub override_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub override_reason: Option<OverrideReason>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub manual_grade: Option<GardnerGrade>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
}

impl ClinicalOverride {
    /// True when no field carries anything.
    pub fn is_empty(&self) -> bool {
        self.override_score.is_none()
            && self.override_reason.is_none()
            && self.manual_grade.is_none()
            && self.notes.as_deref().is_none_or(|n| n.trim().is_empty())
    }
}
