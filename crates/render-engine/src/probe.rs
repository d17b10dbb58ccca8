//! Source media inspection via `ffprobe`.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use swingtrace_common::error::{TracerError, TracerResult};
use swingtrace_project_model::media::MediaInfo;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Probe the first video stream of `path`.
pub fn probe_media(ffprobe_binary: &str, path: &Path) -> TracerResult<MediaInfo> {
    if !path.exists() {
        return Err(TracerError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = Command::new(ffprobe_binary)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate,avg_frame_rate,duration:format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| TracerError::unsupported(format!("Failed to run {ffprobe_binary}: {e}")))?;

    if !output.status.success() {
        return Err(TracerError::export(format!(
            "{ffprobe_binary} failed on {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let info = parse_probe_output(&raw)?;
    tracing::debug!(
        path = %path.display(),
        width = info.width,
        height = info.height,
        duration_secs = ?info.duration_secs,
        fps = ?info.fps,
        "Probed media"
    );
    Ok(info)
}

/// Parse `ffprobe -of json` output into [`MediaInfo`].
pub fn parse_probe_output(raw: &str) -> TracerResult<MediaInfo> {
    let parsed: ProbeOutput = serde_json::from_str(raw)?;
    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| TracerError::validation("No video stream found"))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(TracerError::validation(
                "Video stream reports no usable dimensions",
            ))
        }
    };

    let mut info = MediaInfo::new(width, height);

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate));
    if let Some(fps) = fps {
        info = info.with_fps(fps);
    }

    let duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(stream.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0);
    if let Some(duration) = duration {
        info = info.with_duration(duration);
    }

    Ok(info)
}

/// Parse an ffprobe rational such as `30000/1001`. `0/0` yields `None`.
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let rate = match raw.split_once('/') {
        Some((num, den)) => {
            let num = num.parse::<f64>().ok()?;
            let den = den.parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.parse::<f64>().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("60"), Some(60.0));
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.001);
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    #[test]
    fn test_parse_probe_output() {
        let raw = r#"{
            "programs": [],
            "streams": [
                { "width": 1920, "height": 1080, "r_frame_rate": "60/1", "avg_frame_rate": "0/0" }
            ],
            "format": { "duration": "4.250000" }
        }"#;
        let info = parse_probe_output(raw).unwrap();
        assert_eq!((info.width, info.height), (1920, 1080));
        assert_eq!(info.fps, Some(60.0));
        assert_eq!(info.duration_secs, Some(4.25));
    }

    #[test]
    fn test_parse_probe_output_without_rate_or_duration() {
        let raw = r#"{ "streams": [ { "width": 640, "height": 360 } ], "format": {} }"#;
        let info = parse_probe_output(raw).unwrap();
        assert_eq!(info.fps, None);
        assert_eq!(info.duration_secs, None);
    }

    #[test]
    fn test_parse_probe_output_no_stream() {
        let err = parse_probe_output(r#"{ "streams": [] }"#).unwrap_err();
        assert!(matches!(err, TracerError::Validation { .. }));
    }

    #[test]
    fn test_probe_missing_file() {
        let err = probe_media("ffprobe", Path::new("/definitely/not/here.mp4")).unwrap_err();
        assert!(matches!(err, TracerError::FileNotFound { .. }));
    }
}
