//! Session file: the on-disk form of an editing session.
//!
//! A session file ties the source video, its probed metadata, the tracer
//! style, the point timeline, and the undo history together so edits can
//! continue across runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swingtrace_common::config::PlaybackDefaults;
use swingtrace_common::error::TracerResult;

use crate::history::EditHistory;
use crate::media::MediaInfo;
use crate::point::TracerPoint;
use crate::session::{EditingSession, SessionState};
use crate::style::TracerStyle;

pub const SESSION_FILE_VERSION: &str = "1.0";

/// Top-level session file (`*.swingtrace.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    /// Schema version.
    pub version: String,

    /// Human-readable session name.
    pub name: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Source video, if one has been loaded.
    #[serde(default)]
    pub video: Option<VideoRef>,

    /// Tracer style.
    #[serde(default)]
    pub style: TracerStyle,

    /// Timeline in storage order.
    #[serde(default)]
    pub points: Vec<TracerPoint>,

    /// Undo/redo history.
    #[serde(default)]
    pub history: EditHistory,

    /// Last playback position in seconds.
    #[serde(default)]
    pub playback_secs: f64,
}

/// Reference to the source video with probed metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRef {
    /// Path to the video, relative to the session file when possible.
    pub path: String,

    /// MIME type accepted at upload.
    pub mime_type: String,

    /// Size in bytes at upload.
    pub size_bytes: u64,

    /// Probed media metadata.
    pub media: MediaInfo,
}

impl SessionFile {
    pub fn new(name: impl Into<String>, style: TracerStyle) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: SESSION_FILE_VERSION.to_string(),
            name: name.into(),
            created_at: now.clone(),
            modified_at: now,
            video: None,
            style,
            points: Vec::new(),
            history: EditHistory::new(),
            playback_secs: 0.0,
        }
    }
}

/// A session file loaded from disk together with its location.
#[derive(Debug, Clone)]
pub struct LoadedSession {
    /// Filesystem path of the session file.
    pub path: PathBuf,

    /// File contents.
    pub file: SessionFile,
}

impl LoadedSession {
    /// Load a session file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let file: SessionFile =
            serde_json::from_str(&json).map_err(|e| ProjectError::ParseError {
                path: path.clone(),
                source: e,
            })?;

        if file.version != SESSION_FILE_VERSION {
            return Err(ProjectError::ValidationError {
                message: format!(
                    "Unsupported session version {} (expected {SESSION_FILE_VERSION})",
                    file.version
                ),
            });
        }

        Ok(Self { path, file })
    }

    /// Save the session file, bumping its modification time.
    pub fn save(&mut self) -> Result<(), ProjectError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProjectError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        self.file.modified_at = chrono::Utc::now().to_rfc3339();
        let json =
            serde_json::to_string_pretty(&self.file).map_err(|e| ProjectError::ParseError {
                path: self.path.clone(),
                source: e,
            })?;
        std::fs::write(&self.path, json).map_err(|e| ProjectError::IoError {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Create and save a new, empty session file.
    pub fn create(
        path: impl AsRef<Path>,
        name: impl Into<String>,
        style: TracerStyle,
        video: Option<VideoRef>,
    ) -> Result<Self, ProjectError> {
        let mut file = SessionFile::new(name, style);
        file.video = video;
        let mut loaded = Self {
            path: path.as_ref().to_path_buf(),
            file,
        };
        loaded.save()?;
        Ok(loaded)
    }

    /// Absolute path of the source video.
    pub fn video_path(&self) -> Option<PathBuf> {
        let video = self.file.video.as_ref()?;
        let raw = PathBuf::from(&video.path);
        if raw.is_absolute() {
            return Some(raw);
        }
        let base = self.path.parent().unwrap_or_else(|| Path::new("."));
        Some(base.join(raw))
    }

    /// Rebuild the live editing session.
    pub fn to_session(&self, playback: PlaybackDefaults) -> TracerResult<EditingSession> {
        EditingSession::restore(
            playback,
            SessionState {
                media: self.file.video.as_ref().map(|v| v.media),
                style: self.file.style,
                points: self.file.points.clone(),
                history: self.file.history.clone(),
                playback_secs: self.file.playback_secs,
            },
        )
    }

    /// Copy the live session's state back into the file.
    pub fn absorb(&mut self, session: &EditingSession) {
        let state = session.state();
        self.file.style = state.style;
        self.file.points = state.points;
        self.file.history = state.history;
        self.file.playback_secs = state.playback_secs;
    }

    /// Problems that would stop an export.
    pub fn validate_sources(&self) -> Vec<String> {
        let mut errors = vec![];

        match self.video_path() {
            Some(path) if !path.exists() => {
                errors.push(format!("Video source missing: {}", path.display()));
            }
            Some(_) => {}
            None => errors.push("No video loaded".to_string()),
        }

        if self.file.points.is_empty() {
            errors.push("Timeline has no tracer points".to_string());
        }

        errors
    }
}

/// Errors that can occur when working with session files.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid session: {message}")]
    ValidationError { message: String },
}
