//! embrya-analysis
//!
//! The derivation pipeline behind the dashboard. Pure data, no I/O.
//! Turns the backend's partial prediction payload into the complete,
//! internally-consistent record every panel renders from, ranks a
//! patient's embryo collection, and validates clinician overrides.

pub mod findings;
pub mod normalize;
pub mod ranking;
pub mod validate;

pub use normalize::{normalize, normalize_at};
