//! Upload validation and media metadata.
//!
//! The upload check is the whole contract with whatever picks the file:
//! an accepted MIME type and a size ceiling. Decoding is never done here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use swingtrace_common::clock::PlaybackClock;
use swingtrace_common::config::UploadLimits;
use swingtrace_common::error::{TracerError, TracerResult};

/// A file offered for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl UploadCandidate {
    /// Describe a file on disk, deriving its MIME type from the extension.
    pub fn from_path(path: &Path) -> TracerResult<Self> {
        if !path.exists() {
            return Err(TracerError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mime_type: mime_type_for_path(path).unwrap_or_default().to_string(),
            size_bytes: metadata.len(),
        })
    }
}

/// Validate an upload against the configured limits.
///
/// `None` models an empty file selection. Errors carry the message shown
/// to the user and never touch existing session state.
pub fn validate_upload(
    candidate: Option<&UploadCandidate>,
    limits: &UploadLimits,
) -> TracerResult<()> {
    let Some(candidate) = candidate else {
        return Err(TracerError::validation("No file selected"));
    };

    if !limits
        .allowed_mime_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&candidate.mime_type))
    {
        return Err(TracerError::validation(
            "Please select a valid video file (MP4, WebM, MOV, or AVI)",
        ));
    }

    if candidate.size_bytes > limits.max_bytes {
        return Err(TracerError::validation(format!(
            "File size exceeds {}MB limit",
            limits.max_bytes / (1024 * 1024)
        )));
    }

    Ok(())
}

/// MIME type implied by a video file extension.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "mov" | "qt" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        _ => None,
    }
}

/// What the playback boundary exposes about loaded media.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Intrinsic frame width in pixels (`videoWidth`).
    pub width: u32,
    /// Intrinsic frame height in pixels (`videoHeight`).
    pub height: u32,
    /// Duration in seconds, when known.
    #[serde(default)]
    pub duration_secs: Option<f64>,
    /// Probed frame rate, when known.
    #[serde(default)]
    pub fps: Option<f64>,
}

impl MediaInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            duration_secs: None,
            fps: None,
        }
    }

    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration_secs = Some(duration_secs);
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Frame-space centre of the video.
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Playback clock for this media. `clamp` bounds frames to the duration.
    pub fn clock(&self, fallback_fps: f64, clamp: bool) -> PlaybackClock {
        PlaybackClock::with_media(
            Some(self.fps.unwrap_or(fallback_fps)),
            self.duration_secs.filter(|_| clamp),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(mime: &str, size_bytes: u64) -> UploadCandidate {
        UploadCandidate {
            file_name: "swing.mp4".to_string(),
            mime_type: mime.to_string(),
            size_bytes,
        }
    }

    #[test]
    fn test_accepts_supported_types_within_limit() {
        let limits = UploadLimits::default();
        for mime in [
            "video/mp4",
            "video/webm",
            "video/quicktime",
            "video/x-msvideo",
        ] {
            assert!(validate_upload(Some(&candidate(mime, 1024)), &limits).is_ok());
        }
        assert!(validate_upload(Some(&candidate("video/mp4", limits.max_bytes)), &limits).is_ok());
    }

    #[test]
    fn test_rejects_missing_file() {
        let err = validate_upload(None, &UploadLimits::default()).unwrap_err();
        assert_eq!(err.to_string(), "No file selected");
    }

    #[test]
    fn test_rejects_wrong_type() {
        let err =
            validate_upload(Some(&candidate("image/png", 10)), &UploadLimits::default()).unwrap_err();
        assert!(matches!(err, TracerError::Validation { .. }));
        assert!(err.to_string().contains("MP4, WebM, MOV, or AVI"));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let limits = UploadLimits::default();
        let err = validate_upload(Some(&candidate("video/mp4", limits.max_bytes + 1)), &limits)
            .unwrap_err();
        assert_eq!(err.to_string(), "File size exceeds 100MB limit");
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_type_for_path(Path::new("a/b.MP4")), Some("video/mp4"));
        assert_eq!(mime_type_for_path(Path::new("swing.mov")), Some("video/quicktime"));
        assert_eq!(mime_type_for_path(Path::new("swing.avi")), Some("video/x-msvideo"));
        assert_eq!(mime_type_for_path(Path::new("swing.mkv")), None);
        assert_eq!(mime_type_for_path(Path::new("swing")), None);
    }

    #[test]
    fn test_media_clock_uses_probed_rate_and_duration() {
        let media = MediaInfo::new(1280, 720).with_duration(2.0).with_fps(60.0);
        let clock = media.clock(30.0, true);
        assert_eq!(clock.fps(), 60.0);
        assert_eq!(clock.max_frame(), Some(120));

        let fallback = MediaInfo::new(1280, 720).clock(30.0, true);
        assert_eq!(fallback.fps(), 30.0);
        assert_eq!(fallback.max_frame(), None);
    }
}
