//! Undo and redo.

use std::path::PathBuf;

use swingtrace_common::config::AppConfig;

use super::{open_session, save_session};

pub fn undo(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    step(path, config, true)
}

pub fn redo(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    step(path, config, false)
}

fn step(path: PathBuf, config: &AppConfig, backwards: bool) -> anyhow::Result<()> {
    let (mut loaded, mut session) = open_session(&path, config)?;

    let (applied, verb) = if backwards {
        (session.undo(), "undo")
    } else {
        (session.redo(), "redo")
    };

    if !applied {
        println!("Nothing to {verb}.");
        return Ok(());
    }

    save_session(&mut loaded, &session)?;
    println!(
        "Applied {verb}: {} point(s), history cursor {}",
        session.points().len(),
        session
            .history()
            .cursor()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    Ok(())
}
