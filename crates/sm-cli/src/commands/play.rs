//! Full-screen drill on the terminal.

use sm_core::{DrillConfig, Session};
use tracing::info;

use crate::app::App;

/// Run the full-screen drill.
pub fn run(config: DrillConfig) -> Result<(), String> {
    info!(total = config.total, seed = ?config.seed, "starting terminal drill");
    let session = Session::new(config).map_err(|e| format!("failed to start session: {e}"))?;
    crate::terminal::run(App::new(session))
}
