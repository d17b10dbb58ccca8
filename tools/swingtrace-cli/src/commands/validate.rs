//! Validate a video before it becomes a session.

use std::path::PathBuf;

use swingtrace_common::config::AppConfig;
use swingtrace_project_model::media::{validate_upload, UploadCandidate};

pub fn run(video: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Validating video at: {}", video.display());

    let candidate = UploadCandidate::from_path(&video)?;
    println!("  File: {}", candidate.file_name);
    if candidate.mime_type.is_empty() {
        println!("  Type: unknown");
    } else {
        println!("  Type: {}", candidate.mime_type);
    }
    println!("  Size: {:.1}MB", candidate.size_bytes as f64 / (1024.0 * 1024.0));

    validate_upload(Some(&candidate), &config.upload)?;
    println!("\nVideo is valid.");

    Ok(())
}
