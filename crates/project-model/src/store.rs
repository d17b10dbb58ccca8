//! Tracer point store: the ordered, mutable timeline of points.
//!
//! Storage order is insertion order. Consumers that draw a path decide
//! whether to re-sort by frame; the store never reorders on its own.

use serde::{Deserialize, Serialize};
use swingtrace_common::clock::FrameIndex;
use swingtrace_common::error::{TracerError, TracerResult};

use crate::point::{PointPatch, TracerPoint};

/// Ordered collection of tracer points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TracerStore {
    points: Vec<TracerPoint>,
}

impl TracerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<TracerPoint>) -> Self {
        Self { points }
    }

    /// Append a point. Frames need not be unique or increasing.
    pub fn add(&mut self, point: TracerPoint) {
        self.points.push(point);
    }

    /// Apply `patch` to the point at `index`, returning the updated point.
    ///
    /// Out-of-range indices fail with [`TracerError::Index`] and leave the
    /// store untouched.
    pub fn update(&mut self, index: usize, patch: &PointPatch) -> TracerResult<TracerPoint> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or_else(|| TracerError::index(index, len))?;
        *slot = slot.patched(patch);
        Ok(*slot)
    }

    /// Remove the point at `index`, shifting later points down.
    pub fn remove(&mut self, index: usize) -> TracerResult<TracerPoint> {
        if index >= self.points.len() {
            return Err(TracerError::index(index, self.points.len()));
        }
        Ok(self.points.remove(index))
    }

    /// Atomically replace the whole sequence.
    pub fn replace_all(&mut self, points: impl Into<Vec<TracerPoint>>) {
        self.points = points.into();
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Current sequence in storage order.
    pub fn all(&self) -> &[TracerPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> TracerResult<&TracerPoint> {
        self.points
            .get(index)
            .ok_or_else(|| TracerError::index(index, self.points.len()))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points whose frame playback has reached, in storage order.
    pub fn visible_at(&self, current_frame: FrameIndex) -> impl Iterator<Item = &TracerPoint> {
        self.points
            .iter()
            .filter(move |p| p.is_visible_at(current_frame))
    }

    /// Owned copy of the current sequence.
    pub fn snapshot(&self) -> Vec<TracerPoint> {
        self.points.clone()
    }
}
