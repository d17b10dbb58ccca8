//! Tracer point types.

use serde::{Deserialize, Serialize};
use swingtrace_common::clock::FrameIndex;

/// A single ball-position sample at one video frame, in video pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracerPoint {
    pub frame: FrameIndex,
    pub x: f64,
    pub y: f64,
}

impl TracerPoint {
    pub fn new(frame: FrameIndex, x: f64, y: f64) -> Self {
        Self { frame, x, y }
    }

    /// Euclidean distance from this point to `(x, y)` in pixels.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }

    /// Whether playback at `current_frame` has reached this point.
    pub fn is_visible_at(&self, current_frame: FrameIndex) -> bool {
        self.frame <= current_frame
    }

    /// Copy of this point with the patch fields applied.
    pub fn patched(&self, patch: &PointPatch) -> Self {
        Self {
            frame: patch.frame.unwrap_or(self.frame),
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
        }
    }
}

/// Partial update for a stored point; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl PointPatch {
    /// Patch that moves a point without touching its frame.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            frame: None,
            x: Some(x),
            y: Some(y),
        }
    }

    /// Patch that retimes a point.
    pub fn frame(frame: FrameIndex) -> Self {
        Self {
            frame: Some(frame),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_none() && self.x.is_none() && self.y.is_none()
    }
}

/// Stable sort by ascending frame; points sharing a frame keep their order.
pub fn sorted_by_frame(points: &[TracerPoint]) -> Vec<TracerPoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.frame);
    sorted
}
