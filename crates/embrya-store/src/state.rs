use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use embrya_core::models::embryo::EmbryoResult;
use embrya_core::models::patient::Patient;

use crate::error::StoreError;

const PATIENTS_FILE: &str = "patients.json";
const EMBRYOS_FILE: &str = "embryos.json";
const ACTIVE_PATIENT_FILE: &str = "active_patient";

/// How an embryo save landed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Everything written, images included.
    Full,
    /// First write failed; records were re-written with image payloads
    /// blanked.
    ImagesDropped,
}

/// File-backed store under the platform data directory.
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn open_default() -> Result<Self, StoreError> {
        let base = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        Self::at(base.join("com.embrya.dashboard"))
    }

    /// Open a store rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn load_patients(&self) -> Vec<Patient> {
        self.load_or_empty(PATIENTS_FILE)
    }

    pub fn save_patients(&self, patients: &[Patient]) -> Result<(), StoreError> {
        self.write_json(PATIENTS_FILE, &patients)
    }

    pub fn load_embryos(&self) -> Vec<EmbryoResult> {
        self.load_or_empty(EMBRYOS_FILE)
    }

    /// Save the embryo collection, degrading under storage pressure.
    ///
    /// If the full write fails, every record is re-written with its image
    /// payload blanked and the outcome says so. A second failure is the
    /// caller's problem; in-memory state stays the source of truth.
    pub fn save_embryos(&self, embryos: &[EmbryoResult]) -> Result<PersistOutcome, StoreError> {
        match self.write_json(EMBRYOS_FILE, &embryos) {
            Ok(()) => Ok(PersistOutcome::Full),
            Err(err) => {
                warn!(error = %err, "embryo save failed, retrying without image data");
                let lean = strip_images(embryos);
                self.write_json(EMBRYOS_FILE, &lean)?;
                Ok(PersistOutcome::ImagesDropped)
            }
        }
    }

    pub fn load_active_patient(&self) -> Option<Uuid> {
        let raw = fs::read_to_string(self.path(ACTIVE_PATIENT_FILE)).ok()?;
        match raw.trim().parse() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("active patient file is corrupt, ignoring");
                None
            }
        }
    }

    pub fn save_active_patient(&self, patient_id: Option<Uuid>) -> Result<(), StoreError> {
        let path = self.path(ACTIVE_PATIENT_FILE);
        match patient_id {
            Some(id) => write_atomic(&path, id.to_string().as_bytes()),
            None => {
                if path.exists() {
                    fs::remove_file(&path)?;
                }
                Ok(())
            }
        }
    }

    /// Remove every persisted file. Used by the "clear all data" action.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        for name in [PATIENTS_FILE, EMBRYOS_FILE, ACTIVE_PATIENT_FILE] {
            let path = self.path(name);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Missing files yield an empty collection; corrupt files do too, with
    /// a logged warning, so a bad disk state never blocks startup.
    fn load_or_empty<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let path = self.path(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&contents) {
            Ok(items) => items,
            Err(err) => {
                warn!(file = name, error = %err, "persisted state is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&self.path(name), json.as_bytes())
    }
}

/// Copies of the given records with image payloads blanked, for the
/// degraded save path.
pub fn strip_images(embryos: &[EmbryoResult]) -> Vec<EmbryoResult> {
    embryos
        .iter()
        .map(|embryo| {
            let mut lean = embryo.clone();
            lean.image_url = String::new();
            lean
        })
        .collect()
}

/// Write to a temp file then rename, so readers never observe a torn file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, bytes)?;

    // Clinical data: restrict to the owning user before it lands.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}
