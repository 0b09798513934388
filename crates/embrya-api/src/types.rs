//! Wire DTOs for the backend's REST surface. Field names match the
//! backend's JSON exactly (snake_case, numeric database ids).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: i64,
    pub audit_code: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub id: i64,
    pub patient_id: i64,
    pub cycle_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbryoRecord {
    pub id: i64,
    pub cycle_id: i64,
    pub embryo_id: String,
    pub created_at: String,
}

/// JSON metadata sent alongside the image in the `/predict` multipart form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub patient_audit_code: String,
    pub cycle_id: String,
    pub embryo_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub role: String,
    pub action: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub patient_audit_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cycle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub embryo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogPage {
    pub logs: Vec<AuditLogEntry>,
    pub total: u64,
}

/// Filters for the paged `/audit-logs` listing.
#[derive(Debug, Clone, Default)]
pub struct AuditLogQuery {
    pub page: u32,
    pub limit: u32,
    pub user_id: Option<i64>,
    pub action: Option<String>,
    pub patient_audit_code: Option<String>,
}

impl AuditLogQuery {
    pub fn new() -> Self {
        Self {
            page: 1,
            limit: 50,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRequest {
    pub patient_audit_code: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cycle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub embryo_id: Option<String>,
    pub content: String,
}

/// Record of a clinician overriding the model's score, mirrored to the
/// backend's `/ai-override` audit endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideLogRequest {
    pub embryo_id: String,
    pub original_score: f64,
    pub override_score: f64,
    pub reason: String,
}
