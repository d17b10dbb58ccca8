//! Print overlay draw commands for a single frame.

use std::path::PathBuf;

use swingtrace_common::config::AppConfig;
use swingtrace_render_engine::{OverlayLayer, OverlayRenderer};

use super::open_session;

pub fn run(
    path: PathBuf,
    time: Option<f64>,
    frame: Option<u64>,
    editor: bool,
    selected: Option<usize>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let (_, mut session) = open_session(&path, config)?;
    if session.media().is_none() {
        anyhow::bail!("Session has no video loaded");
    }

    let layer = if editor {
        OverlayLayer::Editor
    } else {
        OverlayLayer::Playback
    };
    let renderer = OverlayRenderer::attach(layer, &mut session);

    let time = match (time, frame) {
        (Some(time), _) => Some(time),
        (None, Some(frame)) => Some(session.clock().time_of(frame)),
        (None, None) => None,
    };
    if let Some(time) = time {
        session.set_playback_time(time);
    }

    if editor {
        session.set_editing(true);
        session.select(selected)?;
    }

    tracing::debug!(
        frame = session.current_frame(),
        layer = ?renderer.layer(),
        "Rendering overlay"
    );
    let commands = renderer.render(&session);
    println!("{}", serde_json::to_string_pretty(&commands)?);

    Ok(())
}
