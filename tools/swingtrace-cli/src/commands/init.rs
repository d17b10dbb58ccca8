//! Create a session file for a video.

use std::path::PathBuf;

use swingtrace_common::config::AppConfig;
use swingtrace_project_model::media::{validate_upload, MediaInfo, UploadCandidate};
use swingtrace_project_model::project::{LoadedSession, VideoRef};
use swingtrace_project_model::style::TracerStyle;
use swingtrace_render_engine::probe_media;

pub struct InitArgs {
    pub video: PathBuf,
    pub output: PathBuf,
    pub name: Option<String>,
    /// Explicit frame size; skips probing.
    pub size: Option<(u32, u32)>,
    pub fps: Option<f64>,
    pub duration: Option<f64>,
}

pub fn run(args: InitArgs, config: &AppConfig) -> anyhow::Result<()> {
    let candidate = UploadCandidate::from_path(&args.video)?;
    validate_upload(Some(&candidate), &config.upload)?;

    let mut media = match args.size {
        Some((width, height)) => MediaInfo::new(width, height),
        None => probe_media(&config.export.ffprobe_binary, &args.video)?,
    };
    if let Some(fps) = args.fps {
        media = media.with_fps(fps);
    }
    if let Some(duration) = args.duration {
        media = media.with_duration(duration);
    }

    let video_path = std::fs::canonicalize(&args.video)?;
    let name = args.name.unwrap_or_else(|| {
        args.video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "swing".to_string())
    });
    let style = TracerStyle::from_defaults(&config.style)?;

    println!("Creating session '{}' at {}", name, args.output.display());

    let loaded = LoadedSession::create(
        &args.output,
        &name,
        style,
        Some(VideoRef {
            path: video_path.to_string_lossy().into_owned(),
            mime_type: candidate.mime_type,
            size_bytes: candidate.size_bytes,
            media,
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to create session: {e}"))?;

    println!("Session created successfully:");
    println!("  File: {}", loaded.path.display());
    println!("  Video: {}", video_path.display());
    println!("  Resolution: {}x{}", media.width, media.height);
    match media.fps {
        Some(fps) => println!("  FPS: {fps:.3}"),
        None => println!(
            "  FPS: unknown (using {})",
            config.playback.fallback_fps
        ),
    }
    if let Some(duration) = media.duration_secs {
        println!("  Duration: {duration:.2}s");
    }

    Ok(())
}
