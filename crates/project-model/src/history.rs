//! Linear undo/redo over full timeline snapshots.
//!
//! States: empty (no snapshots), seeded (one snapshot, cursor 0), and
//! recorded (cursor anywhere in `[0, len - 1]`). Recording after an undo
//! truncates the redo branch.

use serde::{Deserialize, Serialize};
use swingtrace_common::error::{TracerError, TracerResult};

use crate::point::TracerPoint;

/// Immutable copy of the timeline at one edit step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    points: Vec<TracerPoint>,
}

impl Snapshot {
    pub fn new(points: Vec<TracerPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TracerPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<TracerPoint>> for Snapshot {
    fn from(points: Vec<TracerPoint>) -> Self {
        Self::new(points)
    }
}

/// Snapshot list plus cursor.
///
/// Invariant: `cursor < snapshots.len()` whenever any snapshot exists, and
/// `snapshots[cursor]` is the timeline's last materialized state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHistory")]
pub struct EditHistory {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

/// Wire form of [`EditHistory`], validated through
/// [`EditHistory::from_parts`] on load.
#[derive(Deserialize)]
struct RawHistory {
    #[serde(default)]
    snapshots: Vec<Snapshot>,
    #[serde(default)]
    cursor: usize,
}

impl TryFrom<RawHistory> for EditHistory {
    type Error = TracerError;

    fn try_from(raw: RawHistory) -> Result<Self, Self::Error> {
        Self::from_parts(raw.snapshots, raw.cursor)
    }
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts, rejecting a cursor outside the list.
    pub fn from_parts(snapshots: Vec<Snapshot>, cursor: usize) -> TracerResult<Self> {
        if snapshots.is_empty() {
            return Ok(Self::default());
        }
        if cursor >= snapshots.len() {
            return Err(TracerError::index(cursor, snapshots.len()));
        }
        Ok(Self { snapshots, cursor })
    }

    /// Seed history with the first non-empty state seen. Later calls, or
    /// calls with an empty state, do nothing. Returns whether it seeded.
    pub fn observe(&mut self, state: &[TracerPoint]) -> bool {
        if !self.snapshots.is_empty() || state.is_empty() {
            return false;
        }
        self.snapshots.push(Snapshot::new(state.to_vec()));
        self.cursor = 0;
        true
    }

    /// Record a committed edit: drop the redo branch, append, advance.
    pub fn record(&mut self, state: impl Into<Snapshot>) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push(state.into());
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. `None` means there is nothing to undo.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward one snapshot. `None` means there is nothing to redo.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.snapshots.is_empty() && self.cursor + 1 < self.snapshots.len()
    }

    /// Snapshot at the cursor, if seeded.
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.cursor)
    }

    pub fn get(&self, index: usize) -> TracerResult<&Snapshot> {
        self.snapshots
            .get(index)
            .ok_or_else(|| TracerError::index(index, self.snapshots.len()))
    }

    pub fn cursor(&self) -> Option<usize> {
        if self.snapshots.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }
}
