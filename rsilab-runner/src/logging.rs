//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a compact fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g.
/// `"info,rsilab_core=debug"`) is used. Returns `false` if a global
/// subscriber was already installed, leaving it in place.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .compact()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
