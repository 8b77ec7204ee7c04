//! Logging initialization
//!
//! Provides a single initialization point for the engine's tracing output.
//! The engine itself only emits `debug!`/`trace!` events at traversal
//! boundaries; hosts that already install a subscriber can skip this module
//! entirely.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// No subscriber; tests install their own capture when needed
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at application startup; later calls are ignored.
///
/// # Profiles
///
/// - **Development**: human-readable logs, `semblance=debug` by default
/// - **Production**: JSON structured logs, `semblance=info` by default
/// - **Test**: leaves subscriber installation to the test harness
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("semblance=debug")),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("semblance=info")),
                )
                .init();
        }
        Profile::Test => {}
    });
}
