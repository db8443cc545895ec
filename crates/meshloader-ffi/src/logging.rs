//! stderr diagnostics for hosts that do not install a tracing subscriber

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `MESHLOADER_LOG=debug`.
pub const LOG_ENV: &str = "MESHLOADER_LOG";

static INIT: Once = Once::new();

/// Install a stderr subscriber once per process. If the host already set a
/// global subscriber, that one is kept.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
