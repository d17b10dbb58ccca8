//! Export a session to video.

use std::io::Write;
use std::path::PathBuf;

use swingtrace_common::config::AppConfig;
use swingtrace_common::error::TracerError;
use swingtrace_render_engine::{
    probe_media, project_overlay, CanvasSize, ExportProgress, ExportSession, ExportStage,
};

use super::open_session;

pub async fn run(
    path: PathBuf,
    output: Option<PathBuf>,
    preset: Option<String>,
    crf: Option<u32>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    println!("Exporting session at: {}", path.display());

    let (loaded, session) = open_session(&path, config)?;

    let issues = loaded.validate_sources();
    if !issues.is_empty() {
        for issue in &issues {
            println!("  - {issue}");
        }
        anyhow::bail!("{} issue(s) prevent export", issues.len());
    }

    let source = loaded
        .video_path()
        .ok_or_else(|| anyhow::anyhow!("Session has no video loaded"))?;

    // Trust the file on disk over the stored metadata for the overlay size.
    let stored = *session
        .media()
        .ok_or_else(|| anyhow::anyhow!("Session has no video loaded"))?;
    let media = match probe_media(&config.export.ffprobe_binary, &source) {
        Ok(probed) => probed,
        Err(err) => {
            tracing::warn!(error = %err, "Probe failed; using stored media info");
            stored
        }
    };

    let overlay = project_overlay(
        session.points(),
        session.style(),
        CanvasSize::new(media.width, media.height),
        config.playback.path_order,
    )?;

    let output_path = output.unwrap_or_else(|| {
        let dir = path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(format!("{}.mp4", config.export.file_name))
    });

    let mut defaults = config.export.clone();
    if let Some(preset) = preset {
        defaults.preset = preset;
    }
    if let Some(crf) = crf {
        defaults.crf = crf;
    }

    println!("  Source: {}", source.display());
    println!("  Output: {}", output_path.display());
    println!("  Resolution: {}x{}", media.width, media.height);
    println!("  Encoder: libx264 preset={} crf={}", defaults.preset, defaults.crf);

    let mut export = ExportSession::new(defaults);
    let job = export.job(&source, &output_path, overlay, media.duration_secs);

    let cancel = export.cancel_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let progress_cb: Box<dyn Fn(ExportProgress) + Send> = Box::new(|p| {
        if p.stage == ExportStage::Rendering {
            print!("\r  Progress: {:>3}% (ETA: {:.0}s)  ", p.percent, p.eta_secs);
            let _ = std::io::stdout().flush();
        }
    });

    let result = export.run(job, Some(progress_cb)).await;
    ctrl_c.abort();
    export.close()?;

    match result {
        Ok(written) => {
            println!("\nExport complete: {}", written.display());
            Ok(())
        }
        Err(TracerError::ExportCancelled) => {
            println!("\nExport cancelled.");
            Ok(())
        }
        Err(e) => {
            println!("\n{}", failure_message(&e));
            Err(e.into())
        }
    }
}

/// Line shown to the user when an export fails. Internal errors are logged
/// in full and summarised on screen.
fn failure_message(err: &TracerError) -> String {
    if err.is_user_facing() {
        format!("Export failed: {err}")
    } else {
        tracing::error!(error = ?err, "Export failed with an internal error");
        "Export failed due to an internal error; rerun with --verbose for details".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_shows_user_facing_errors() {
        let err = TracerError::export("ffmpeg exited with status 1");
        assert_eq!(
            failure_message(&err),
            "Export failed: ffmpeg exited with status 1"
        );
    }

    #[test]
    fn test_failure_message_hides_internal_errors() {
        let err = TracerError::index(3, 1);
        assert!(!failure_message(&err).contains("Index 3"));
    }
}
