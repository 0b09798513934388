//! embrya-store
//!
//! Local JSON persistence for the dashboard's working set: the patient
//! list, the embryo list (including derived analyses), and the active
//! patient id. Written on every state change, reloaded at startup.
//! Image payloads are the one thing allowed to be dropped under storage
//! pressure; see [`state::Store::save_embryos`].

pub mod error;
pub mod state;

pub use state::{strip_images, PersistOutcome, Store};
