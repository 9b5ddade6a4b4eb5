//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process, filtered via `RUST_LOG`
/// (default level: `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    init_with(filter);
}

/// Initialize with explicit filter directives, e.g. `"splitledger=debug"`.
///
/// Useful in tests and tools where the environment should not decide what
/// gets logged. Safe to call multiple times.
pub fn init_with_filter(directives: &str) {
    init_with(EnvFilter::new(directives));
}

fn init_with(filter: EnvFilter) {
    // JSON logs + timestamps; later calls lose the race and become no-ops.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
