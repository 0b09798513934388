use serde::Serialize;
use tracing::info;

/// A structured audit event tied to a patient cycle.
///
/// Every override, upload, and report export is recorded with a timestamp
/// for compliance; the identifiers mirror the backend's audit-log schema
/// so local and remote trails line up.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: String,
    pub patient_audit_code: Option<String>,
    pub cycle_id: Option<String>,
    pub embryo_id: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            patient_audit_code: None,
            cycle_id: None,
            embryo_id: None,
            details: None,
        }
    }

    pub fn patient(mut self, audit_code: impl Into<String>) -> Self {
        self.patient_audit_code = Some(audit_code.into());
        self
    }

    pub fn cycle(mut self, cycle_id: impl Into<String>) -> Self {
        self.cycle_id = Some(cycle_id.into());
        self
    }

    pub fn embryo(mut self, embryo_id: impl Into<String>) -> Self {
        self.embryo_id = Some(embryo_id.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        info!(
            audit.action = %self.action,
            audit.patient = self.patient_audit_code.as_deref().unwrap_or("-"),
            audit.cycle = self.cycle_id.as_deref().unwrap_or("-"),
            audit.embryo = self.embryo_id.as_deref().unwrap_or("-"),
            "audit event"
        );
    }
}
