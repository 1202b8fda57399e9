//! Tracing initialization for host applications.

use tracing_subscriber::EnvFilter;

/// Install a global subscriber filtered by `RUST_LOG` (default `info`).
///
/// Host applications call this once at startup; library code only emits
/// events. Calling it twice is a no-op rather than a panic so embedding
/// callers and tests can both use it freely.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
