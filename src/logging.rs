// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber, level from RUST_LOG
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging on stderr
///
/// # Environment
/// - RUST_LOG: filter directive (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=recycling_planning=trace
///
/// # Example
/// ```no_run
/// use recycling_planning::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize logging for tests
///
/// Debug level, routed through the test writer. Safe to call repeatedly.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
