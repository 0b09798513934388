//! Pure state transitions.
//!
//! Each reducer takes the state and a payload, mutates in place, and
//! leaves ranking globally consistent for the affected patient. No I/O
//! here; the session layer persists after the fact.

use thiserror::Error;
use uuid::Uuid;

use embrya_analysis::ranking::assign_ranks_scoped;
use embrya_analysis::validate::{validate_override, OverrideValidationError};
use embrya_core::models::embryo::EmbryoResult;
use embrya_core::models::overrides::ClinicalOverride;
use embrya_core::models::patient::Patient;

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReduceError {
    #[error("unknown embryo: {0}")]
    UnknownEmbryo(Uuid),

    #[error("unknown patient: {0}")]
    UnknownPatient(Uuid),

    #[error(transparent)]
    InvalidOverride(#[from] OverrideValidationError),
}

pub fn select_patient(
    state: &mut AppState,
    patient_id: Option<Uuid>,
) -> Result<(), ReduceError> {
    if let Some(id) = patient_id {
        if state.patient(id).is_none() {
            return Err(ReduceError::UnknownPatient(id));
        }
    }
    state.active_patient_id = patient_id;
    Ok(())
}

/// Insert a patient, or replace the record with the same id.
pub fn upsert_patient(state: &mut AppState, patient: Patient) {
    match state.patients.iter_mut().find(|p| p.id == patient.id) {
        Some(existing) => *existing = patient,
        None => state.patients.push(patient),
    }
}

/// Add a freshly analyzed embryo and restore rank consistency across its
/// patient's whole collection.
pub fn apply_new_analysis(state: &mut AppState, embryo: EmbryoResult) {
    let patient_id = embryo.patient_id;
    state.embryos.push(embryo);
    rerank(state, patient_id);
}

/// Apply a validated clinician override.
///
/// The submission replaces all four override fields (the form is
/// pre-filled with the current values). The embedded derived prediction
/// is never touched.
pub fn apply_override(
    state: &mut AppState,
    embryo_id: Uuid,
    draft: &ClinicalOverride,
) -> Result<(), ReduceError> {
    validate_override(draft)?;

    let embryo = state
        .embryos
        .iter_mut()
        .find(|e| e.id == embryo_id)
        .ok_or(ReduceError::UnknownEmbryo(embryo_id))?;

    embryo.override_score = draft.override_score;
    embryo.override_reason = draft.override_reason;
    embryo.manual_grade = draft.manual_grade;
    embryo.notes = draft.notes.clone();

    let patient_id = embryo.patient_id;
    rerank(state, patient_id);
    Ok(())
}

/// Mark one embryo as the selected ("best") candidate within its patient,
/// clearing the flag on its siblings.
pub fn select_best(state: &mut AppState, embryo_id: Uuid) -> Result<(), ReduceError> {
    let patient_id = state
        .embryo(embryo_id)
        .ok_or(ReduceError::UnknownEmbryo(embryo_id))?
        .patient_id;

    for embryo in &mut state.embryos {
        if embryo.patient_id == patient_id {
            embryo.is_selected = embryo.id == embryo_id;
        }
    }
    Ok(())
}

fn rerank(state: &mut AppState, patient_id: Option<Uuid>) {
    assign_ranks_scoped(&mut state.embryos, |e| e.patient_id == patient_id);
}
