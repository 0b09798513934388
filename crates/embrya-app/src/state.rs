use uuid::Uuid;

use embrya_core::models::embryo::EmbryoResult;
use embrya_core::models::patient::Patient;

/// The whole of the dashboard's mutable state, owned by one controller.
///
/// Mutations go through the reducer functions in [`crate::reducers`];
/// persistence observes transitions from the session layer and never
/// reaches into derivation logic.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub patients: Vec<Patient>,
    pub embryos: Vec<EmbryoResult>,
    pub active_patient_id: Option<Uuid>,
}

impl AppState {
    pub fn active_patient(&self) -> Option<&Patient> {
        let id = self.active_patient_id?;
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn patient(&self, id: Uuid) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn embryo(&self, id: Uuid) -> Option<&EmbryoResult> {
        self.embryos.iter().find(|e| e.id == id)
    }

    /// All embryos linked to the given patient, in insertion order.
    pub fn patient_embryos(
        &self,
        patient_id: Option<Uuid>,
    ) -> impl Iterator<Item = &EmbryoResult> {
        self.embryos
            .iter()
            .filter(move |e| e.patient_id == patient_id)
    }
}
