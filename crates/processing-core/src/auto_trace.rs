//! Automatic ball tracing.

use serde::{Deserialize, Serialize};
use swingtrace_common::error::{TracerError, TracerResult};
use swingtrace_project_model::media::MediaInfo;
use swingtrace_project_model::point::TracerPoint;

/// Progress sink receiving whole percentages in `0..=100`.
pub type TrackProgress<'a> = &'a mut dyn FnMut(u8);

/// Produces tracer points for a video.
pub trait BallTracker {
    /// Tracker name for logs.
    fn name(&self) -> &str;

    /// Trace the ball through `media`, reporting progress as it goes.
    fn track(&self, media: &MediaInfo, progress: TrackProgress<'_>)
        -> TracerResult<Vec<TracerPoint>>;
}

/// Shape of the synthetic launch curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticTrackerConfig {
    /// Number of points generated.
    pub num_points: usize,
    /// Launch position in pixels.
    pub start_x: f64,
    pub start_y: f64,
    /// Horizontal advance per point in pixels.
    pub step_x: f64,
    /// Frames between consecutive points.
    pub frame_step: u64,
    /// Vertical rise is `rise * i^exponent` pixels.
    pub rise: f64,
    pub exponent: f64,
}

impl Default for SyntheticTrackerConfig {
    fn default() -> Self {
        Self {
            num_points: 20,
            start_x: 100.0,
            start_y: 200.0,
            step_x: 30.0,
            frame_step: 3,
            rise: 2.0,
            exponent: 1.5,
        }
    }
}

/// Stand-in tracker generating the same curve for every video.
#[derive(Debug, Clone, Default)]
pub struct SyntheticTracker {
    config: SyntheticTrackerConfig,
}

impl SyntheticTracker {
    pub fn new(config: SyntheticTrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyntheticTrackerConfig {
        &self.config
    }

    fn point(&self, i: usize) -> TracerPoint {
        let c = &self.config;
        let step = i as f64;
        TracerPoint::new(
            i as u64 * c.frame_step,
            c.start_x + step * c.step_x,
            c.start_y - step.powf(c.exponent) * c.rise,
        )
    }
}

impl BallTracker for SyntheticTracker {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn track(
        &self,
        media: &MediaInfo,
        progress: TrackProgress<'_>,
    ) -> TracerResult<Vec<TracerPoint>> {
        if media.width == 0 || media.height == 0 {
            return Err(TracerError::tracking("Video has no frame dimensions"));
        }

        tracing::info!(
            tracker = self.name(),
            width = media.width,
            height = media.height,
            points = self.config.num_points,
            "Tracing ball path"
        );

        // 0, 10, ..., 90 before the final 100.
        for pct in (0..100u8).step_by(10) {
            progress(pct);
        }

        let points = (0..self.config.num_points).map(|i| self.point(i)).collect();
        progress(100);
        Ok(points)
    }
}
