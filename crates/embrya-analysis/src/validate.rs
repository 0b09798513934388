//! Override submission validation.
//!
//! Rejected locally, before anything reaches a backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use embrya_core::models::overrides::ClinicalOverride;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum OverrideValidationError {
    #[error("Override Reason is required when providing an override score.")]
    MissingReason,

    #[error("Override score {value} is outside range [0, 100].")]
    ScoreOutOfRange { value: f64 },

    #[error("Please fill at least one field to submit an override.")]
    EmptySubmission,
}

/// Validate a clinician's override submission.
///
/// A score requires a reason from the fixed set, must lie in [0, 100],
/// and a fully empty submission is rejected.
pub fn validate_override(draft: &ClinicalOverride) -> Result<(), OverrideValidationError> {
    if let Some(score) = draft.override_score {
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(OverrideValidationError::ScoreOutOfRange { value: score });
        }
        if draft.override_reason.is_none() {
            return Err(OverrideValidationError::MissingReason);
        }
    }
    if draft.is_empty() {
        return Err(OverrideValidationError::EmptySubmission);
    }
    Ok(())
}
