//! The session controller.
//!
//! Owns the application state and the three collaborators around it: the
//! backend client, the local store, and report generation. Every mutation
//! goes through a reducer, then persistence runs as an observer of the
//! transition. Single-threaded by construction: backend calls block, and
//! batch uploads are strictly sequential.

use base64::Engine;
use eyre::{eyre, Result, WrapErr};
use tracing::{error, info, warn};
use uuid::Uuid;

use embrya_analysis::{findings, normalize};
use embrya_api::multipart::content_type_for_extension;
use embrya_api::types::{OverrideLogRequest, PredictionRequest};
use embrya_api::ApiClient;
use embrya_audit::AuditEvent;
use embrya_core::models::comprehensive::ComprehensivePrediction;
use embrya_core::models::embryo::{EmbryoResult, ProcessingStatus};
use embrya_core::models::overrides::ClinicalOverride;
use embrya_core::models::patient::Patient;
use embrya_export::{generate_pdf_report, render_text_report, ReportOptions};
use embrya_store::{PersistOutcome, Store};

use crate::config::EmbryaConfig;
use crate::reducers;
use crate::state::AppState;

/// One image queued for analysis.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Both report artifacts for one embryo, generated together.
pub struct ReportArtifacts {
    pub text: String,
    pub pdf: Vec<u8>,
}

pub struct Session {
    state: AppState,
    client: ApiClient,
    store: Store,
}

impl Session {
    /// Open the default store, reload persisted state, and point the
    /// client at the configured backend.
    pub fn bootstrap(config: &EmbryaConfig) -> Result<Self> {
        let store = Store::open_default()?;
        Ok(Self::with_parts(
            ApiClient::new(&config.api_base_url),
            store,
        ))
    }

    /// Assemble a session from explicit parts. Test hook, and the way a
    /// shell supplies a custom store location.
    pub fn with_parts(client: ApiClient, store: Store) -> Self {
        let state = AppState {
            patients: store.load_patients(),
            embryos: store.load_embryos(),
            active_patient_id: store.load_active_patient(),
        };
        info!(
            patients = state.patients.len(),
            embryos = state.embryos.len(),
            "session restored from local store"
        );
        Self {
            state,
            client,
            store,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.client
            .login(username, password)
            .wrap_err("login failed")?;
        AuditEvent::new("login")
            .with_details(serde_json::json!({ "username": username }))
            .emit();
        Ok(())
    }

    pub fn add_patient(&mut self, patient: Patient) -> Result<()> {
        reducers::upsert_patient(&mut self.state, patient);
        self.persist();
        Ok(())
    }

    pub fn select_patient(&mut self, patient_id: Option<Uuid>) -> Result<()> {
        reducers::select_patient(&mut self.state, patient_id)?;
        self.persist();
        Ok(())
    }

    /// Upload a batch of images for analysis.
    ///
    /// Rejected synchronously before any network call when no patient is
    /// active or the batch is empty. Files are processed strictly
    /// sequentially; the first failure aborts the remainder and discards
    /// everything the batch had already produced. Commit happens only
    /// after every file normalized. No automatic retry.
    pub fn upload_batch(
        &mut self,
        files: &[UploadFile],
        development_day: Option<u8>,
    ) -> Result<Vec<Uuid>> {
        let patient = self
            .state
            .active_patient()
            .cloned()
            .ok_or_else(|| eyre!("no active patient selected"))?;
        if files.is_empty() {
            return Err(eyre!("no files selected for analysis"));
        }

        let existing = self.state.patient_embryos(Some(patient.id)).count();
        let mut staged = Vec::with_capacity(files.len());

        for (offset, file) in files.iter().enumerate() {
            let name = format!("EMB-{:03}", existing + offset + 1);
            let metadata = PredictionRequest {
                patient_audit_code: patient.audit_code_or_id(),
                cycle_id: patient.cycle_number.to_string(),
                embryo_id: name.clone(),
            };
            let raw = self
                .client
                .predict(&file.bytes, &file.filename, &metadata)
                .wrap_err_with(|| format!("prediction failed for {}", file.filename))?;
            let analysis = normalize(&raw, development_day);
            staged.push(build_embryo(
                name,
                file,
                patient.id,
                development_day,
                analysis,
            ));
        }

        let ids: Vec<Uuid> = staged.iter().map(|e| e.id).collect();
        for embryo in staged {
            AuditEvent::new("predict")
                .patient(patient.audit_code_or_id())
                .cycle(patient.cycle_number.to_string())
                .embryo(embryo.name.clone())
                .emit();
            reducers::apply_new_analysis(&mut self.state, embryo);
        }
        self.persist();
        Ok(ids)
    }

    /// Apply a clinician override.
    ///
    /// Validation failures surface before anything leaves the machine.
    /// On success the override is mirrored to the backend audit endpoint;
    /// a failure there is logged but does not roll back local state.
    pub fn submit_override(&mut self, embryo_id: Uuid, draft: &ClinicalOverride) -> Result<()> {
        let (embryo_name, original_score) = {
            let embryo = self
                .state
                .embryo(embryo_id)
                .ok_or_else(|| eyre!("unknown embryo: {embryo_id}"))?;
            (embryo.name.clone(), embryo.viability_score)
        };

        reducers::apply_override(&mut self.state, embryo_id, draft)?;

        if let (Some(score), Some(reason)) = (draft.override_score, draft.override_reason) {
            let request = OverrideLogRequest {
                embryo_id: embryo_name.clone(),
                original_score,
                override_score: score,
                reason: reason.to_string(),
            };
            if let Err(err) = self.client.log_override(&request) {
                warn!(error = %err, "failed to mirror override to backend audit trail");
            }
        }

        AuditEvent::new("ai_override")
            .embryo(embryo_name)
            .with_details(serde_json::to_value(draft)?)
            .emit();
        self.persist();
        Ok(())
    }

    pub fn select_best(&mut self, embryo_id: Uuid) -> Result<()> {
        reducers::select_best(&mut self.state, embryo_id)?;
        self.persist();
        Ok(())
    }

    /// Generate both report artifacts for one embryo.
    pub fn export_report(
        &mut self,
        embryo_id: Uuid,
        options: &ReportOptions,
    ) -> Result<ReportArtifacts> {
        let embryo = self
            .state
            .embryo(embryo_id)
            .ok_or_else(|| eyre!("unknown embryo: {embryo_id}"))?
            .clone();
        let patient = embryo
            .patient_id
            .and_then(|id| self.state.patient(id))
            .cloned();

        let generated_at = jiff::Timestamp::now();
        let text = render_text_report(&embryo, patient.as_ref(), options, generated_at)?;
        let pdf = generate_pdf_report(&embryo, patient.as_ref(), options, generated_at)?;

        AuditEvent::new("report_export").embryo(embryo.name).emit();
        Ok(ReportArtifacts { text, pdf })
    }

    /// Persistence as an observer of state transitions. Failures degrade
    /// (images dropped, then logged); the in-memory state stays the
    /// source of truth for the session either way.
    fn persist(&mut self) {
        if let Err(err) = self.store.save_patients(&self.state.patients) {
            error!(error = %err, "failed to persist patients");
        }
        match self.store.save_embryos(&self.state.embryos) {
            Ok(PersistOutcome::Full) => {}
            Ok(PersistOutcome::ImagesDropped) => {
                warn!("saved embryos without image data due to storage limit");
            }
            Err(err) => {
                error!(
                    error = %err,
                    "failed to persist embryos; in-memory state remains authoritative"
                );
            }
        }
        if let Err(err) = self
            .store
            .save_active_patient(self.state.active_patient_id)
        {
            error!(error = %err, "failed to persist active patient");
        }
    }
}

fn build_embryo(
    name: String,
    file: &UploadFile,
    patient_id: Uuid,
    development_day: Option<u8>,
    analysis: ComprehensivePrediction,
) -> EmbryoResult {
    let extension = file.filename.rsplit('.').next().unwrap_or_default();
    let image_url = format!(
        "data:{};base64,{}",
        content_type_for_extension(extension),
        base64::engine::general_purpose::STANDARD.encode(&file.bytes)
    );

    EmbryoResult {
        id: Uuid::new_v4(),
        name,
        image_url,
        viability_score: analysis.viability_score,
        rank: 0, // assigned by the ranking pass on commit
        features: findings::summary_block(&analysis),
        key_findings: findings::key_findings(analysis.viability_score),
        recommendation: findings::recommendation(analysis.viability_score),
        patient_id: Some(patient_id),
        development_day,
        comprehensive_analysis: Some(analysis),
        is_selected: false,
        manual_grade: None,
        override_score: None,
        override_reason: None,
        notes: None,
        uploaded_at: Some(jiff::Timestamp::now()),
        processing_status: ProcessingStatus::Completed,
    }
}
