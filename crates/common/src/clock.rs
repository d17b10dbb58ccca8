//! Playback clock: maps continuous media time to discrete frame indices.
//!
//! The clock is the single source of "current frame" truth. Every
//! frame/time conversion in SwingTrace goes through it so the frame rate
//! (probed or the 30 fps fallback) is threaded through consistently.

use crate::config::FALLBACK_FPS;

/// Slack added before flooring so `frame_at(time_of(f)) == f` survives
/// floating-point rounding in the division.
const FRAME_EPSILON: f64 = 1e-6;

/// Frame index within a video.
pub type FrameIndex = u64;

/// Converts between playback time (seconds) and frame indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    fps: f64,
    max_frame: Option<FrameIndex>,
}

impl PlaybackClock {
    /// Clock at the given frame rate with no duration bound.
    ///
    /// Non-finite or non-positive rates fall back to 30 fps.
    pub fn new(fps: f64) -> Self {
        Self {
            fps: sanitize_fps(fps),
            max_frame: None,
        }
    }

    /// Clock for loaded media. A missing frame rate falls back to 30 fps;
    /// a known duration bounds the frame index.
    pub fn with_media(fps: Option<f64>, duration_secs: Option<f64>) -> Self {
        let clock = Self::new(fps.unwrap_or(FALLBACK_FPS));
        match duration_secs {
            Some(duration) => clock.clamped_to(duration),
            None => clock,
        }
    }

    /// Bound frame indices to `[0, floor(duration * fps)]`.
    pub fn clamped_to(mut self, duration_secs: f64) -> Self {
        self.max_frame = if duration_secs.is_finite() && duration_secs >= 0.0 {
            Some(self.raw_frame(duration_secs))
        } else {
            None
        };
        self
    }

    /// Frames per second in use.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Last addressable frame, if the media duration is known.
    pub fn max_frame(&self) -> Option<FrameIndex> {
        self.max_frame
    }

    /// Frame shown at `time_secs`: `floor(time * fps)`, clamped.
    pub fn frame_at(&self, time_secs: f64) -> FrameIndex {
        let frame = self.raw_frame(time_secs);
        match self.max_frame {
            Some(max) => frame.min(max),
            None => frame,
        }
    }

    /// Seek position for a frame (`frame / fps`).
    pub fn time_of(&self, frame: FrameIndex) -> f64 {
        frame as f64 / self.fps
    }

    fn raw_frame(&self, time_secs: f64) -> FrameIndex {
        if !time_secs.is_finite() || time_secs <= 0.0 {
            return 0;
        }
        (time_secs * self.fps + FRAME_EPSILON).floor() as FrameIndex
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(FALLBACK_FPS)
    }
}

fn sanitize_fps(fps: f64) -> f64 {
    if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        FALLBACK_FPS
    }
}
