//! SwingTrace CLI: trace, edit, preview, and export golf ball tracers.
//!
//! Usage:
//!   swingtrace init <VIDEO>        Create a session for a video
//!   swingtrace trace <SESSION>     Auto-trace the ball
//!   swingtrace edit <SESSION> ...  Add, move, remove, or select points
//!   swingtrace undo <SESSION>      Step back through edit history
//!   swingtrace render <SESSION>    Print overlay draw commands for a frame
//!   swingtrace export <SESSION>    Burn the tracer into a new video
//!   swingtrace check               Check ffmpeg/ffprobe availability

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use swingtrace_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "swingtrace",
    about = "Golf ball tracer overlays for swing videos",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check system capabilities
    Check,

    /// Check whether a video is acceptable for upload
    Validate {
        /// Path to the video file
        video: PathBuf,
    },

    /// Create a new session for a video
    Init {
        /// Path to the video file
        video: PathBuf,

        /// Session file to create
        #[arg(short, long, default_value = "session.json")]
        output: PathBuf,

        /// Session name (defaults to the video file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Frame width; skips ffprobe when given with --height
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Frame height; skips ffprobe when given with --width
        #[arg(long, requires = "width")]
        height: Option<u32>,

        /// Frame rate override
        #[arg(long)]
        fps: Option<f64>,

        /// Duration override in seconds
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Automatically trace the ball into the session
    Trace {
        /// Path to the session file
        session: PathBuf,
    },

    /// Show session information
    Info {
        /// Path to the session file
        session: PathBuf,
    },

    /// Edit tracer points
    Edit {
        /// Path to the session file
        session: PathBuf,

        #[command(subcommand)]
        action: commands::edit::EditAction,
    },

    /// Undo the last edit
    Undo {
        /// Path to the session file
        session: PathBuf,
    },

    /// Redo the last undone edit
    Redo {
        /// Path to the session file
        session: PathBuf,
    },

    /// Print the overlay draw commands for one frame as JSON
    Render {
        /// Path to the session file
        session: PathBuf,

        /// Playback time in seconds
        #[arg(long, conflicts_with = "frame")]
        time: Option<f64>,

        /// Frame index
        #[arg(long)]
        frame: Option<u64>,

        /// Render the editing layer instead of playback
        #[arg(long)]
        editor: bool,

        /// Selected point index (editor layer)
        #[arg(long, requires = "editor")]
        selected: Option<usize>,
    },

    /// Write the full tracer as an SVG overlay
    Overlay {
        /// Path to the session file
        session: PathBuf,

        /// Output SVG path
        #[arg(short, long, default_value = "overlay.svg")]
        output: PathBuf,
    },

    /// Export the traced video
    Export {
        /// Path to the session file
        session: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// x264 preset override
        #[arg(long)]
        preset: Option<String>,

        /// x264 CRF override
        #[arg(long)]
        crf: Option<u32>,
    },

    /// Change tracer style
    Style {
        /// Path to the session file
        session: PathBuf,

        /// Colour as #rrggbb
        #[arg(long)]
        color: Option<String>,

        /// Line width in pixels (1-10)
        #[arg(long)]
        width: Option<f64>,

        /// Opacity (0.1-1.0)
        #[arg(long)]
        opacity: Option<f64>,

        /// solid, dashed, or dotted
        #[arg(long)]
        line_style: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    swingtrace_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Check => commands::check::run(&config),
        Commands::Validate { video } => commands::validate::run(video, &config),
        Commands::Init {
            video,
            output,
            name,
            width,
            height,
            fps,
            duration,
        } => commands::init::run(
            commands::init::InitArgs {
                video,
                output,
                name,
                size: width.zip(height),
                fps,
                duration,
            },
            &config,
        ),
        Commands::Trace { session } => commands::trace::run(session, &config),
        Commands::Info { session } => commands::info::run(session, &config),
        Commands::Edit { session, action } => commands::edit::run(session, action, &config),
        Commands::Undo { session } => commands::history::undo(session, &config),
        Commands::Redo { session } => commands::history::redo(session, &config),
        Commands::Render {
            session,
            time,
            frame,
            editor,
            selected,
        } => commands::render::run(session, time, frame, editor, selected, &config),
        Commands::Overlay { session, output } => commands::overlay::run(session, output, &config),
        Commands::Export {
            session,
            output,
            preset,
            crf,
        } => commands::export::run(session, output, preset, crf, &config).await,
        Commands::Style {
            session,
            color,
            width,
            opacity,
            line_style,
        } => commands::style::run(
            session,
            commands::style::StyleArgs {
                color,
                width,
                opacity,
                line_style,
            },
            &config,
        ),
    }
}
