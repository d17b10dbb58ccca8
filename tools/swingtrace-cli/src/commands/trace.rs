//! Run automatic ball tracing on a session.

use std::io::Write;
use std::path::PathBuf;

use swingtrace_common::config::AppConfig;
use swingtrace_processing_core::{BallTracker, SyntheticTracker};

use super::{open_session, save_session};

pub fn run(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Tracing session at: {}", path.display());

    let (mut loaded, mut session) = open_session(&path, config)?;
    let media = *session
        .media()
        .ok_or_else(|| anyhow::anyhow!("Session has no video loaded"))?;

    let tracker = SyntheticTracker::default();
    tracing::info!(tracker = tracker.name(), "Starting ball tracking");

    let mut report = |percent: u8| {
        print!("\r  Progress: {percent:>3}%");
        let _ = std::io::stdout().flush();
    };
    let points = tracker.track(&media, &mut report)?;
    println!();

    session.ingest_tracked(points);
    save_session(&mut loaded, &session)?;

    println!("  Traced {} points", session.points().len());
    println!(
        "  History: {} snapshot(s)",
        session.history().len()
    );
    println!("\nTracing complete.");

    Ok(())
}
