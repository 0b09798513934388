//! embrya-core
//!
//! Pure domain types for the Embrya embryo viability dashboard.
//! No I/O; this is the shared vocabulary between the normalizer, the
//! backend client, local persistence, and the TypeScript dashboard
//! (via ts-rs bindings).

pub mod error;
pub mod models;
