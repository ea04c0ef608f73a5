//! Tracing/logging setup shared by binaries.

/// Initialize process-wide logging from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(&tracing::LogConfig::from_env());
}

/// Subscriber configuration and installation.
pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat};
