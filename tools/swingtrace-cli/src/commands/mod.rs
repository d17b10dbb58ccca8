pub mod check;
pub mod edit;
pub mod export;
pub mod history;
pub mod info;
pub mod init;
pub mod overlay;
pub mod render;
pub mod style;
pub mod trace;
pub mod validate;

use std::path::Path;

use swingtrace_common::config::AppConfig;
use swingtrace_project_model::{EditingSession, LoadedSession};

/// Load a session file and rebuild its live editing session.
pub fn open_session(
    path: &Path,
    config: &AppConfig,
) -> anyhow::Result<(LoadedSession, EditingSession)> {
    let loaded =
        LoadedSession::load(path).map_err(|e| anyhow::anyhow!("Failed to load session: {e}"))?;
    let session = loaded
        .to_session(config.playback.clone())
        .map_err(|e| anyhow::anyhow!("Failed to restore session: {e}"))?;
    Ok((loaded, session))
}

/// Write the live session back to its file.
pub fn save_session(loaded: &mut LoadedSession, session: &EditingSession) -> anyhow::Result<()> {
    loaded.absorb(session);
    loaded
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save session: {e}"))
}
