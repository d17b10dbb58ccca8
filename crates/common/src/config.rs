//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Playback and path-drawing settings.
    pub playback: PlaybackDefaults,

    /// Tracer style applied to new sessions.
    pub style: StyleDefaults,

    /// Upload validation limits.
    pub upload: UploadLimits,

    /// Export encoder settings.
    pub export: ExportDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Order in which tracer points are joined into a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PathOrder {
    /// Stable sort by ascending frame; ties keep insertion order.
    #[default]
    Frame,
    /// Storage order, exactly as points were inserted.
    Insertion,
}

/// Playback clock and overlay defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackDefaults {
    /// Frame rate used when the media frame rate is unknown.
    pub fallback_fps: f64,

    /// Clamp frame indices to the media duration when it is known.
    pub clamp_to_duration: bool,

    /// Path ordering for the live overlay and the export.
    pub path_order: PathOrder,
}

/// Default tracer style, kept as plain values so every crate can read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    /// Stroke colour as `#rrggbb`.
    pub color: String,
    /// Stroke width in pixels, `[1, 10]`.
    pub width: f64,
    /// Stroke opacity, `[0.1, 1]`.
    pub opacity: f64,
    /// `solid`, `dashed` or `dotted`.
    pub line_style: String,
}

/// Accepted uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    /// Maximum accepted file size in bytes.
    pub max_bytes: u64,

    /// Accepted MIME types.
    pub allowed_mime_types: Vec<String>,
}

/// Export encoder defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// x264 preset.
    pub preset: String,

    /// x264 constant rate factor.
    pub crf: u32,

    /// Default output file stem.
    pub file_name: String,

    /// ffmpeg executable.
    pub ffmpeg_binary: String,

    /// ffprobe executable.
    pub ffprobe_binary: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "swingtrace=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

/// Fallback frame rate when the media frame rate cannot be probed.
pub const FALLBACK_FPS: f64 = 30.0;

/// Default upload ceiling: 100 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

impl Default for PlaybackDefaults {
    fn default() -> Self {
        Self {
            fallback_fps: FALLBACK_FPS,
            clamp_to_duration: true,
            path_order: PathOrder::Frame,
        }
    }
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            color: "#ff0000".to_string(),
            width: 3.0,
            opacity: 0.8,
            line_style: "solid".to_string(),
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_mime_types: vec![
                "video/mp4".to_string(),
                "video/webm".to_string(),
                "video/quicktime".to_string(),
                "video/x-msvideo".to_string(),
            ],
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            preset: "medium".to_string(),
            crf: 23,
            file_name: "traced_golf_swing".to_string(),
            ffmpeg_binary: "ffmpeg".to_string(),
            ffprobe_binary: "ffprobe".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("swingtrace").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_upload_contract() {
        let config = AppConfig::default();
        assert_eq!(config.upload.max_bytes, 104_857_600);
        assert_eq!(config.upload.allowed_mime_types.len(), 4);
        assert!((config.playback.fallback_fps - 30.0).abs() < 1e-9);
        assert_eq!(config.playback.path_order, PathOrder::Frame);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "playback": { "path_order": "insertion" }, "export": { "crf": 18 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.playback.path_order, PathOrder::Insertion);
        assert!(config.playback.clamp_to_duration);
        assert_eq!(config.export.crf, 18);
        assert_eq!(config.export.preset, "medium");
        assert_eq!(config.style.color, "#ff0000");
    }

    #[test]
    fn test_save_and_load_roundtrip_through_file() {
        let dir = std::env::temp_dir().join("swingtrace_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.logging.level = "debug".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.logging.level, "debug");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unparsable_config_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("swingtrace_test_config_bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.export.crf, 23);

        std::fs::remove_dir_all(&dir).ok();
    }
}
