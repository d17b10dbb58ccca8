//! Write the export overlay as SVG.

use std::path::PathBuf;

use swingtrace_common::config::AppConfig;
use swingtrace_render_engine::{project_overlay, CanvasSize};

use super::open_session;

pub fn run(path: PathBuf, output: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let (_, session) = open_session(&path, config)?;
    let media = session
        .media()
        .ok_or_else(|| anyhow::anyhow!("Session has no video loaded"))?;

    let overlay = project_overlay(
        session.points(),
        session.style(),
        CanvasSize::new(media.width, media.height),
        config.playback.path_order,
    )?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, overlay.to_svg())?;

    println!("Overlay written to: {}", output.display());
    println!("  Size: {}x{}", overlay.width, overlay.height);
    println!("  Markers: {}", overlay.markers.len());

    Ok(())
}
