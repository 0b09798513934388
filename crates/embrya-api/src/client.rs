use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::info;
use ureq::{Agent, Body};

use embrya_core::models::prediction::RawPrediction;

use crate::error::ApiError;
use crate::multipart::{content_type_for_extension, MultipartForm};
use crate::types::{
    AuditLogPage, AuditLogQuery, CycleRecord, EmbryoRecord, LoginResponse, NoteRequest,
    OverrideLogRequest, PatientRecord, PredictionRequest, UserAccount,
};

/// Client for the external prediction backend.
///
/// Holds the bearer token after [`ApiClient::login`]; every other call
/// attaches it when present and lets the backend reject the rest.
pub struct ApiClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(60)))
            .build()
            .new_agent();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `POST /auth/login`. Stores the returned bearer token on success.
    pub fn login(&mut self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self.post_json(
            "/auth/login",
            &serde_json::json!({ "username": username, "password": password }),
        )?;
        self.token = Some(response.access_token.clone());
        info!(username, "authenticated against backend");
        Ok(response)
    }

    pub fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<UserAccount, ApiError> {
        self.post_json(
            "/auth/register",
            &serde_json::json!({ "username": username, "password": password, "role": role }),
        )
    }

    pub fn patients(&self) -> Result<Vec<PatientRecord>, ApiError> {
        self.get("/patients")
    }

    pub fn create_patient(&self, audit_code: &str) -> Result<PatientRecord, ApiError> {
        self.post_json("/patients", &serde_json::json!({ "audit_code": audit_code }))
    }

    pub fn cycles(&self) -> Result<Vec<CycleRecord>, ApiError> {
        self.get("/cycles")
    }

    pub fn create_cycle(&self, patient_id: i64, cycle_id: &str) -> Result<CycleRecord, ApiError> {
        self.post_json(
            "/cycles",
            &serde_json::json!({ "patient_id": patient_id, "cycle_id": cycle_id }),
        )
    }

    pub fn embryos(&self) -> Result<Vec<EmbryoRecord>, ApiError> {
        self.get("/embryos")
    }

    pub fn create_embryo(&self, cycle_id: i64, embryo_id: &str) -> Result<EmbryoRecord, ApiError> {
        self.post_json(
            "/embryos",
            &serde_json::json!({ "cycle_id": cycle_id, "embryo_id": embryo_id }),
        )
    }

    /// `POST /predict`: multipart upload of one image plus its JSON
    /// metadata. The response is parsed leniently: whatever subset of
    /// fields the backend produced becomes a [`RawPrediction`].
    pub fn predict(
        &self,
        image: &[u8],
        filename: &str,
        metadata: &PredictionRequest,
    ) -> Result<RawPrediction, ApiError> {
        let extension = filename.rsplit('.').next().unwrap_or_default();
        let form = MultipartForm::new()
            .file(
                "file",
                filename,
                content_type_for_extension(extension),
                image,
            )
            .text("prediction_data", &serde_json::to_string(metadata)?);
        let (content_type, body) = form.finish();

        info!(
            filename,
            bytes = body.len(),
            embryo_id = %metadata.embryo_id,
            "uploading image for prediction"
        );

        let mut request = self
            .agent
            .post(format!("{}/predict", self.base_url))
            .header("Content-Type", content_type);
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        let mut response = request.send(&body[..])?;
        let body = Self::check(&mut response)?;
        let value: serde_json::Value = body.read_json()?;
        Ok(RawPrediction::from_value(value))
    }

    pub fn audit_logs(&self, query: &AuditLogQuery) -> Result<AuditLogPage, ApiError> {
        let mut request = self
            .agent
            .get(format!("{}/audit-logs", self.base_url))
            .query("page", query.page.to_string())
            .query("limit", query.limit.to_string());
        if let Some(user_id) = query.user_id {
            request = request.query("user_id", user_id.to_string());
        }
        if let Some(action) = &query.action {
            request = request.query("action", action);
        }
        if let Some(code) = &query.patient_audit_code {
            request = request.query("patient_audit_code", code);
        }
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        let mut response = request.call()?;
        Self::check(&mut response)?.read_json().map_err(Into::into)
    }

    /// `GET /export/{csv|pdf}`: backend-rendered audit log export.
    pub fn export_audit_logs(&self, format: &str) -> Result<Vec<u8>, ApiError> {
        let mut request = self
            .agent
            .get(format!("{}/export/{format}", self.base_url));
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        let mut response = request.call()?;
        let body = Self::check(&mut response)?;
        body.read_to_vec().map_err(Into::into)
    }

    pub fn create_note(&self, note: &NoteRequest) -> Result<serde_json::Value, ApiError> {
        self.post_json("/notes", note)
    }

    /// Mirror a clinician override to the backend audit trail.
    pub fn log_override(&self, entry: &OverrideLogRequest) -> Result<serde_json::Value, ApiError> {
        info!(
            embryo_id = %entry.embryo_id,
            original_score = entry.original_score,
            override_score = entry.override_score,
            reason = %entry.reason,
            "logging score override"
        );
        self.post_json("/ai-override", entry)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let mut request = self.agent.get(format!("{}{path}", self.base_url));
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        let mut response = request.call()?;
        Self::check(&mut response)?.read_json().map_err(Into::into)
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl serde::Serialize,
    ) -> Result<T, ApiError> {
        let mut request = self.agent.post(format!("{}{path}", self.base_url));
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        let mut response = request.send_json(payload)?;
        Self::check(&mut response)?.read_json().map_err(Into::into)
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }

    /// Surface non-2xx responses with the backend's own message text.
    fn check(response: &mut ureq::http::Response<Body>) -> Result<&mut Body, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .body_mut()
                .read_to_string()
                .unwrap_or_else(|_| String::new());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.body_mut())
    }
}
