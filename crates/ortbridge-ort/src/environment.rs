use std::sync::OnceLock;

use tracing::debug;

static ENGINE_INIT: OnceLock<()> = OnceLock::new();

/// Commits the process-wide engine environment on first use.
///
/// Every facade that talks to the engine routes through this gate, so the
/// environment exists before the first session is built no matter which
/// entry point the caller reaches first.
pub fn ensure_initialized() {
    ENGINE_INIT.get_or_init(|| {
        let _ = ort::init().commit();
        debug!("engine environment committed");
    });
}
