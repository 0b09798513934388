use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A patient record as managed by the dashboard.
///
/// Field casing mirrors the dashboard's existing JSON: camelCase, except
/// for the handful of backend-sourced identifiers that were always
/// snake_case on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub cycle_number: u32,
    pub created_at: jiff::Timestamp,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub age: Option<u32>,
    #[serde(rename = "audit_code", skip_serializing_if = "Option::is_none", default)]
    pub audit_code: Option<String>,
    #[serde(
        rename = "assigned_doctor",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub assigned_doctor: Option<String>,
    #[serde(
        rename = "contact_number",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
}

impl Patient {
    /// The audit code quoted in `/predict` metadata, falling back to the
    /// local id when the backend never assigned one.
    pub fn audit_code_or_id(&self) -> String {
        self.audit_code
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}
