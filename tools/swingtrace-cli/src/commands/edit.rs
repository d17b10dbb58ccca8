//! Point editing commands.

use std::path::PathBuf;

use clap::Subcommand;
use swingtrace_common::config::AppConfig;
use swingtrace_project_model::point::{PointPatch, TracerPoint};

use super::{open_session, save_session};

#[derive(Subcommand)]
pub enum EditAction {
    /// Add a point at the playback position (or an explicit frame/time)
    Add {
        x: f64,
        y: f64,

        /// Frame index for the new point
        #[arg(long, conflicts_with = "time")]
        frame: Option<u64>,

        /// Playback time in seconds for the new point
        #[arg(long)]
        time: Option<f64>,
    },

    /// Add a point at the centre of the video and select it
    Center {
        /// Playback time in seconds
        #[arg(long)]
        time: Option<f64>,
    },

    /// Move a point
    Move {
        index: usize,
        x: f64,
        y: f64,

        /// Also retime the point to this frame
        #[arg(long)]
        frame: Option<u64>,
    },

    /// Remove a point
    Remove { index: usize },

    /// Select a point and seek playback to its frame
    Select { index: usize },

    /// Simulate an editor click at (x, y)
    Click {
        x: f64,
        y: f64,

        /// Playback time in seconds
        #[arg(long)]
        time: Option<f64>,

        /// Point selected before the click
        #[arg(long)]
        selected: Option<usize>,
    },
}

pub fn run(path: PathBuf, action: EditAction, config: &AppConfig) -> anyhow::Result<()> {
    let (mut loaded, mut session) = open_session(&path, config)?;

    match action {
        EditAction::Add { x, y, frame, time } => {
            let index = match (frame, time) {
                (Some(frame), _) => session.add_point(TracerPoint::new(frame, x, y)),
                (None, Some(time)) => {
                    session.set_playback_time(time);
                    session.add_point_at(x, y)
                }
                (None, None) => session.add_point_at(x, y),
            };
            let p = session.points()[index];
            println!("Added point {index}: frame {} ({:.1}, {:.1})", p.frame, p.x, p.y);
        }
        EditAction::Center { time } => {
            if let Some(time) = time {
                session.set_playback_time(time);
            }
            let index = session.add_point_at_center()?;
            let p = session.points()[index];
            println!(
                "Added point {index} at centre: frame {} ({:.1}, {:.1})",
                p.frame, p.x, p.y
            );
        }
        EditAction::Move { index, x, y, frame } => {
            let patch = PointPatch {
                frame,
                ..PointPatch::position(x, y)
            };
            let p = session.update_point(index, patch)?;
            println!("Moved point {index}: frame {} ({:.1}, {:.1})", p.frame, p.x, p.y);
        }
        EditAction::Remove { index } => {
            let p = session.remove_point(index)?;
            println!("Removed point {index}: frame {} ({:.1}, {:.1})", p.frame, p.x, p.y);
        }
        EditAction::Select { index } => {
            let seek = session.select(Some(index))?.unwrap_or_default();
            println!("Selected point {index}; playback at {seek:.3}s");
        }
        EditAction::Click {
            x,
            y,
            time,
            selected,
        } => {
            if let Some(time) = time {
                session.set_playback_time(time);
            }
            session.set_editing(true);
            if selected.is_some() {
                session.select(selected)?;
            }
            let outcome = session.click(x, y)?;
            println!("{outcome:?}");
        }
    }

    save_session(&mut loaded, &session)?;
    println!("  Points: {}, history: {}", session.points().len(), session.history().len());

    Ok(())
}
