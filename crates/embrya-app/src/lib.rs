//! embrya-app
//!
//! The application layer a dashboard shell embeds: owned state, pure
//! reducers, the session controller that ties the backend client,
//! normalizer, store, and report generation together, and the versioned
//! on-disk config.

pub mod config;
pub mod reducers;
pub mod session;
pub mod state;

/// Install error reporting and tracing for an embedding shell.
///
/// Call once at startup, before constructing a [`session::Session`].
pub fn init() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    Ok(())
}
