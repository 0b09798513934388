//! The raw, untrusted prediction payload returned by the backend.
//!
//! Every field is optional and numeric fields tolerate type-mismatched
//! JSON (a string where a number belongs becomes `None` rather than a
//! deserialization error). The normalizer owns all defaulting; nothing
//! here is allowed to fail on a partial payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// One ensemble member's output, passed through verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ModelPrediction {
    pub model: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub prediction: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub probability_good: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub probability_not_good: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_f64")]
    pub confidence: Option<f64>,
}

/// Backend morphokinetics block; all fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct RawMorphokinetics {
    #[serde(deserialize_with = "lenient_f64")]
    pub predicted_day: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub estimated_developmental_stage: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub timing_assessment: Option<String>,
}

/// The loosely-typed bag of fields the `/predict` endpoint returns.
///
/// None of these are guaranteed present. The normalizer must produce a
/// usable [`super::comprehensive::ComprehensivePrediction`] even when
/// every one of them is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct RawPrediction {
    #[serde(deserialize_with = "lenient_string")]
    pub prediction: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub viability_score: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub confidence: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub confidence_level: Option<String>,
    #[serde(deserialize_with = "lenient_predictions")]
    pub model_predictions: Option<Vec<ModelPrediction>>,
    #[serde(deserialize_with = "lenient_feature_map")]
    pub features: Option<BTreeMap<String, f64>>,
    #[serde(deserialize_with = "lenient_feature_map")]
    pub feature_importance: Option<BTreeMap<String, f64>>,
    #[serde(deserialize_with = "lenient_morphokinetics")]
    pub morphokinetics: Option<RawMorphokinetics>,
    pub confusion_matrix: Option<serde_json::Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub analysis_timestamp: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub processing_time_ms: Option<f64>,
}

impl RawPrediction {
    /// Parse an arbitrary JSON document into a raw prediction.
    ///
    /// Non-object documents (and anything else serde rejects outright)
    /// collapse to the empty payload; the normalizer's fallbacks take it
    /// from there.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| v.is_finite()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}

fn lenient_feature_map<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(entries) = value else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|(name, v)| v.as_f64().filter(|n| n.is_finite()).map(|n| (name, n)))
            .collect(),
    ))
}

fn lenient_predictions<'de, D>(deserializer: D) -> Result<Option<Vec<ModelPrediction>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

fn lenient_morphokinetics<'de, D>(deserializer: D) -> Result<Option<RawMorphokinetics>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
