//! Show session information.

use std::path::PathBuf;

use swingtrace_common::config::AppConfig;

use super::open_session;

pub fn run(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let (loaded, session) = open_session(&path, config)?;
    let f = &loaded.file;

    println!("Session: {}", f.name);
    println!("  Version: {}", f.version);
    println!("  Created: {}", f.created_at);
    println!("  Modified: {}", f.modified_at);
    println!();

    println!("Video:");
    match (&f.video, loaded.video_path()) {
        (Some(video), Some(path)) => {
            println!("  Path: {}", path.display());
            println!("  Type: {} ({} bytes)", video.mime_type, video.size_bytes);
            println!(
                "  Resolution: {}x{}",
                video.media.width, video.media.height
            );
            println!("  FPS: {:.3}", session.clock().fps());
            if let Some(duration) = video.media.duration_secs {
                println!("  Duration: {duration:.2}s");
            }
        }
        _ => println!("  (none)"),
    }
    println!();

    let style = session.style();
    println!("Style:");
    println!("  Color: {}", style.color);
    println!("  Width: {}", style.width);
    println!("  Opacity: {}", style.opacity);
    println!("  Line: {}", style.line_style.as_str());
    println!();

    println!(
        "Playback: {:.3}s (frame {})",
        session.playback_secs(),
        session.current_frame()
    );
    println!();

    println!("Points ({}):", session.points().len());
    for (i, p) in session.points().iter().enumerate() {
        println!("  [{i:>3}] frame {:>5}  ({:.1}, {:.1})", p.frame, p.x, p.y);
    }
    println!();

    let history = session.history();
    println!("History:");
    println!("  Snapshots: {}", history.len());
    match history.cursor() {
        Some(cursor) => println!("  Cursor: {cursor}"),
        None => println!("  Cursor: (empty)"),
    }
    println!(
        "  Undo: {}, Redo: {}",
        if history.can_undo() { "yes" } else { "no" },
        if history.can_redo() { "yes" } else { "no" }
    );

    Ok(())
}
