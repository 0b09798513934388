//! embrya-audit
//!
//! Structured clinical audit events, emitted via `tracing`. The backend
//! keeps its own authoritative audit trail for API actions; these
//! application-level events add local context (which patient cycle, which
//! embryo, what the clinician changed) for compliance review.

pub mod events;

pub use events::AuditEvent;
