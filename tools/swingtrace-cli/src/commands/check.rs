//! Check system capabilities.

use swingtrace_common::config::{config_file_path, AppConfig};
use swingtrace_render_engine::command_exists;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("SwingTrace System Check");
    println!("{}", "=".repeat(50));

    let tools = [
        ("ffmpeg", config.export.ffmpeg_binary.as_str(), "export"),
        ("ffprobe", config.export.ffprobe_binary.as_str(), "media probing"),
    ];

    let mut all_ok = true;
    for (label, binary, purpose) in tools {
        if command_exists(binary) {
            println!("[OK] {label}: {binary}");
        } else {
            all_ok = false;
            println!("[MISSING] {label}: {binary} (needed for {purpose})");
        }
    }

    let config_path = config_file_path();
    println!();
    if config_path.exists() {
        println!("Config: {}", config_path.display());
    } else {
        println!("Config: defaults ({} not found)", config_path.display());
    }
    println!(
        "Upload limit: {}MB, fallback FPS: {}",
        config.upload.max_bytes / (1024 * 1024),
        config.playback.fallback_fps
    );

    println!();
    if all_ok {
        println!("All external tools are available. SwingTrace is ready.");
    } else {
        println!("Some tools are missing. Install ffmpeg to enable probing and export.");
    }

    Ok(())
}
