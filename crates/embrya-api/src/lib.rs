//! embrya-api
//!
//! Blocking HTTP client for the external prediction backend. Thin wrapper:
//! authentication, the multipart `/predict` upload, and the REST
//! passthroughs. No retry logic anywhere; failures surface to the caller
//! with the backend's own words.

pub mod client;
pub mod error;
pub mod multipart;
pub mod types;

pub use client::ApiClient;
