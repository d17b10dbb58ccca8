//! Editing session: the single owner of the timeline.
//!
//! Every committed point edit flows store → history → listeners, so undo
//! after any successful edit is meaningful and renderers re-run on each
//! change. There is exactly one writer; listeners only observe.

use std::fmt;

use swingtrace_common::clock::{FrameIndex, PlaybackClock};
use swingtrace_common::config::PlaybackDefaults;
use swingtrace_common::error::{TracerError, TracerResult};

use crate::history::EditHistory;
use crate::media::MediaInfo;
use crate::point::{PointPatch, TracerPoint};
use crate::store::TracerStore;
use crate::style::TracerStyle;

/// Pixel radius within which a click grabs an existing point.
pub const HIT_RADIUS_PX: f64 = 15.0;

/// Change notifications; each one means the overlay must be repainted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// The point sequence changed (edit, undo, redo, tracking).
    PointsChanged,
    /// Playback moved to a different frame.
    FrameChanged(FrameIndex),
    StyleChanged,
    SelectionChanged(Option<usize>),
    EditingChanged(bool),
    /// Timeline and history were discarded.
    Reset,
}

/// Callback invoked for every [`SessionEvent`].
pub type SessionListener = Box<dyn FnMut(&SessionEvent)>;

/// Handle returned by [`EditingSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a click on the editor canvas did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Not in editing mode; nothing happened.
    Ignored,
    /// An existing point was selected and playback sought to it.
    Selected { index: usize, seek_secs: f64 },
    /// The selected point moved to the click position.
    Moved { index: usize, point: TracerPoint },
    /// A new point was added at the current frame.
    Added { index: usize, point: TracerPoint },
}

/// Everything needed to rebuild a session from disk.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub media: Option<MediaInfo>,
    pub style: TracerStyle,
    pub points: Vec<TracerPoint>,
    pub history: EditHistory,
    pub playback_secs: f64,
}

pub struct EditingSession {
    store: TracerStore,
    history: EditHistory,
    style: TracerStyle,
    media: Option<MediaInfo>,
    playback: PlaybackDefaults,
    clock: PlaybackClock,
    playback_secs: f64,
    current_frame: FrameIndex,
    selected: Option<usize>,
    editing: bool,
    listeners: Vec<(SubscriptionId, SessionListener)>,
    next_subscription: u64,
}

impl EditingSession {
    pub fn new(playback: PlaybackDefaults, style: TracerStyle) -> Self {
        Self {
            store: TracerStore::new(),
            history: EditHistory::new(),
            style,
            media: None,
            clock: PlaybackClock::new(playback.fallback_fps),
            playback,
            playback_secs: 0.0,
            current_frame: 0,
            selected: None,
            editing: false,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Rebuild a session from persisted state.
    pub fn restore(playback: PlaybackDefaults, state: SessionState) -> TracerResult<Self> {
        state.style.validate()?;
        if !state.history.is_empty() {
            let current = state.history.current().ok_or_else(|| {
                TracerError::project("History cursor is outside the saved snapshots")
            })?;
            if current.points() != state.points.as_slice() {
                return Err(TracerError::project(
                    "History cursor does not match the saved points",
                ));
            }
        }

        let mut session = Self::new(playback, state.style);
        if let Some(media) = state.media {
            session.clock = media.clock(
                session.playback.fallback_fps,
                session.playback.clamp_to_duration,
            );
            session.media = Some(media);
        }
        session.store.replace_all(state.points);
        session.history = state.history;
        session.history.observe(session.store.all());
        session.playback_secs = state.playback_secs.max(0.0);
        session.current_frame = session.clock.frame_at(session.playback_secs);
        Ok(session)
    }

    /// Snapshot of everything worth persisting.
    pub fn state(&self) -> SessionState {
        SessionState {
            media: self.media,
            style: self.style,
            points: self.store.snapshot(),
            history: self.history.clone(),
            playback_secs: self.playback_secs,
        }
    }

    // ---- observers -------------------------------------------------------

    pub fn subscribe(&mut self, listener: SessionListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Drop a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: SessionEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    // ---- lifecycle -------------------------------------------------------

    /// Start a fresh timeline for newly loaded media.
    pub fn load_media(&mut self, media: MediaInfo) {
        tracing::info!(
            width = media.width,
            height = media.height,
            duration_secs = ?media.duration_secs,
            fps = ?media.fps,
            "Media loaded"
        );
        self.clock = media.clock(self.playback.fallback_fps, self.playback.clamp_to_duration);
        self.media = Some(media);
        self.discard_timeline();
    }

    /// Discard the video, timeline, and history.
    pub fn reset(&mut self) {
        self.media = None;
        self.clock = PlaybackClock::new(self.playback.fallback_fps);
        self.discard_timeline();
    }

    fn discard_timeline(&mut self) {
        self.store.clear();
        self.history.clear();
        self.selected = None;
        self.playback_secs = 0.0;
        self.current_frame = 0;
        self.notify(SessionEvent::Reset);
    }

    /// Replace the timeline with automatically tracked points.
    ///
    /// The first non-empty result seeds history; later runs are recorded
    /// as ordinary edits so they can be undone.
    pub fn ingest_tracked(&mut self, points: Vec<TracerPoint>) {
        tracing::info!(points = points.len(), "Ingesting tracked points");
        self.store.replace_all(points);
        if !self.history.observe(self.store.all()) && !self.history.is_empty() {
            self.history.record(self.store.snapshot());
        }
        self.clear_selection();
        self.notify(SessionEvent::PointsChanged);
    }

    // ---- point edits -----------------------------------------------------

    fn commit(&mut self) {
        self.history.record(self.store.snapshot());
        tracing::debug!(
            points = self.store.len(),
            history_len = self.history.len(),
            "Edit committed"
        );
        self.notify(SessionEvent::PointsChanged);
    }

    /// Append a point. Returns its index.
    pub fn add_point(&mut self, point: TracerPoint) -> usize {
        self.store.add(point);
        self.commit();
        self.store.len() - 1
    }

    /// Append a point at `(x, y)` on the current frame.
    pub fn add_point_at(&mut self, x: f64, y: f64) -> usize {
        self.add_point(TracerPoint::new(self.current_frame, x, y))
    }

    /// Append a point at the centre of the video on the current frame and
    /// select it.
    pub fn add_point_at_center(&mut self) -> TracerResult<usize> {
        let media = self
            .media
            .ok_or_else(|| TracerError::validation("No video loaded"))?;
        let (x, y) = media.center();
        let index = self.add_point_at(x, y);
        self.set_selection(Some(index));
        Ok(index)
    }

    /// Apply `patch` to the point at `index`. An empty patch changes
    /// nothing and records no history.
    pub fn update_point(&mut self, index: usize, patch: PointPatch) -> TracerResult<TracerPoint> {
        if patch.is_empty() {
            return self.store.get(index).copied();
        }
        let point = self.store.update(index, &patch)?;
        self.commit();
        Ok(point)
    }

    pub fn remove_point(&mut self, index: usize) -> TracerResult<TracerPoint> {
        let removed = self.store.remove(index)?;
        let selection = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        self.set_selection(selection);
        self.commit();
        Ok(removed)
    }

    /// Remove the selected point, if any.
    pub fn remove_selected(&mut self) -> TracerResult<Option<TracerPoint>> {
        match self.selected {
            Some(index) => self.remove_point(index).map(Some),
            None => Ok(None),
        }
    }

    /// Move the selected point, if any.
    pub fn move_selected(&mut self, x: f64, y: f64) -> TracerResult<Option<TracerPoint>> {
        match self.selected {
            Some(index) => self.update_point(index, PointPatch::position(x, y)).map(Some),
            None => Ok(None),
        }
    }

    // ---- history ---------------------------------------------------------

    /// Restore the previous snapshot. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            tracing::debug!("Nothing to undo");
            return false;
        };
        self.store.replace_all(snapshot.points().to_vec());
        self.after_history_step();
        true
    }

    /// Re-apply the next snapshot. Returns `false` when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            tracing::debug!("Nothing to redo");
            return false;
        };
        self.store.replace_all(snapshot.points().to_vec());
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        self.clear_selection();
        self.notify(SessionEvent::PointsChanged);
    }

    // ---- playback, selection, style ---------------------------------------

    /// Follow playback to `time_secs`.
    pub fn set_playback_time(&mut self, time_secs: f64) {
        self.playback_secs = if time_secs.is_finite() {
            time_secs.max(0.0)
        } else {
            0.0
        };
        let frame = self.clock.frame_at(self.playback_secs);
        if frame != self.current_frame {
            self.current_frame = frame;
            self.notify(SessionEvent::FrameChanged(frame));
        }
    }

    /// Select a point (seeking playback to its frame) or clear selection.
    ///
    /// Returns the seek position in seconds when a point was selected.
    pub fn select(&mut self, index: Option<usize>) -> TracerResult<Option<f64>> {
        let Some(index) = index else {
            self.clear_selection();
            return Ok(None);
        };
        let frame = self.store.get(index)?.frame;
        self.set_selection(Some(index));
        let seek_secs = self.clock.time_of(frame);
        self.set_playback_time(seek_secs);
        Ok(Some(seek_secs))
    }

    fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    fn set_selection(&mut self, selection: Option<usize>) {
        if self.selected != selection {
            self.selected = selection;
            self.notify(SessionEvent::SelectionChanged(selection));
        }
    }

    pub fn set_style(&mut self, style: TracerStyle) -> TracerResult<()> {
        style.validate()?;
        if style != self.style {
            self.style = style;
            self.notify(SessionEvent::StyleChanged);
        }
        Ok(())
    }

    /// Enter or leave editing mode. Either way the selection is cleared.
    pub fn set_editing(&mut self, editing: bool) {
        self.clear_selection();
        if self.editing != editing {
            self.editing = editing;
            self.notify(SessionEvent::EditingChanged(editing));
        }
    }

    /// First point within [`HIT_RADIUS_PX`] of `(x, y)`, in storage order.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.store
            .all()
            .iter()
            .position(|p| p.distance_to(x, y) < HIT_RADIUS_PX)
    }

    /// Handle a click on the editor canvas at frame-space `(x, y)`.
    pub fn click(&mut self, x: f64, y: f64) -> TracerResult<ClickOutcome> {
        if !self.editing {
            return Ok(ClickOutcome::Ignored);
        }

        if let Some(index) = self.hit_test(x, y) {
            let seek_secs = self.select(Some(index))?.unwrap_or_default();
            return Ok(ClickOutcome::Selected { index, seek_secs });
        }

        if let Some(index) = self.selected {
            let point = self.update_point(index, PointPatch::position(x, y))?;
            return Ok(ClickOutcome::Moved { index, point });
        }

        let index = self.add_point_at(x, y);
        let point = *self.store.get(index)?;
        Ok(ClickOutcome::Added { index, point })
    }

    // ---- accessors -------------------------------------------------------

    pub fn points(&self) -> &[TracerPoint] {
        self.store.all()
    }

    pub fn store(&self) -> &TracerStore {
        &self.store
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn style(&self) -> &TracerStyle {
        &self.style
    }

    pub fn media(&self) -> Option<&MediaInfo> {
        self.media.as_ref()
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn playback(&self) -> &PlaybackDefaults {
        &self.playback
    }

    pub fn current_frame(&self) -> FrameIndex {
        self.current_frame
    }

    pub fn playback_secs(&self) -> f64 {
        self.playback_secs
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new(PlaybackDefaults::default(), TracerStyle::default())
    }
}

impl fmt::Debug for EditingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditingSession")
            .field("points", &self.store.len())
            .field("history_len", &self.history.len())
            .field("history_cursor", &self.history.cursor())
            .field("current_frame", &self.current_frame)
            .field("selected", &self.selected)
            .field("editing", &self.editing)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session_with_media() -> EditingSession {
        let mut session = EditingSession::default();
        session.load_media(MediaInfo::new(1280, 720).with_duration(10.0));
        session
    }

    fn recorder(session: &mut EditingSession) -> Rc<RefCell<Vec<SessionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(Box::new(move |event| sink.borrow_mut().push(*event)));
        events
    }

    #[test]
    fn test_every_edit_is_recorded_before_notification() {
        let mut session = session_with_media();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(Box::new(move |event| sink.borrow_mut().push(*event)));

        session.add_point(TracerPoint::new(0, 1.0, 1.0));
        session.add_point(TracerPoint::new(3, 2.0, 2.0));
        session.update_point(0, PointPatch::position(5.0, 5.0)).unwrap();
        session.remove_point(1).unwrap();

        assert_eq!(session.history().len(), 4);
        assert_eq!(
            session.history().current().unwrap().points(),
            session.points()
        );
        assert_eq!(
            seen.borrow()
                .iter()
                .filter(|e| **e == SessionEvent::PointsChanged)
                .count(),
            4
        );
    }

    #[test]
    fn test_empty_patch_is_a_no_op() {
        let mut session = session_with_media();
        session.add_point(TracerPoint::new(2, 4.0, 6.0));
        let events = recorder(&mut session);

        let point = session.update_point(0, PointPatch::default()).unwrap();
        assert_eq!(point, TracerPoint::new(2, 4.0, 6.0));
        assert_eq!(session.history().len(), 1);
        assert!(events.borrow().is_empty());
        assert!(session.update_point(5, PointPatch::default()).is_err());
    }

    #[test]
    fn test_failed_edit_records_nothing() {
        let mut session = session_with_media();
        let events = recorder(&mut session);

        assert!(session.update_point(0, PointPatch::position(1.0, 1.0)).is_err());
        assert!(session.remove_point(3).is_err());
        assert!(session.history().is_empty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_undo_redo_route_through_replace_all() {
        let mut session = session_with_media();
        session.ingest_tracked(vec![TracerPoint::new(0, 100.0, 200.0)]);
        session.add_point(TracerPoint::new(3, 130.0, 194.0));
        assert_eq!(session.points().len(), 2);

        assert!(session.undo());
        assert_eq!(session.points(), &[TracerPoint::new(0, 100.0, 200.0)]);
        assert!(!session.undo());

        assert!(session.redo());
        assert_eq!(session.points().len(), 2);
        assert!(!session.redo());
    }

    #[test]
    fn test_tracking_seeds_history_once() {
        let mut session = session_with_media();
        session.ingest_tracked(Vec::new());
        assert!(session.history().is_empty());

        session.ingest_tracked(vec![TracerPoint::new(0, 1.0, 1.0)]);
        assert_eq!(session.history().len(), 1);

        session.ingest_tracked(vec![TracerPoint::new(0, 2.0, 2.0)]);
        assert_eq!(session.history().len(), 2);
        assert!(session.undo());
        assert_eq!(session.points(), &[TracerPoint::new(0, 1.0, 1.0)]);
    }

    #[test]
    fn test_select_seeks_to_point_frame() {
        let mut session = session_with_media();
        session.ingest_tracked(vec![
            TracerPoint::new(0, 0.0, 0.0),
            TracerPoint::new(45, 10.0, 10.0),
        ]);
        let events = recorder(&mut session);

        let seek = session.select(Some(1)).unwrap();
        assert_eq!(seek, Some(1.5));
        assert_eq!(session.current_frame(), 45);
        assert_eq!(
            *events.borrow(),
            vec![
                SessionEvent::SelectionChanged(Some(1)),
                SessionEvent::FrameChanged(45)
            ]
        );

        assert!(session.select(Some(7)).is_err());
        assert_eq!(session.selected(), Some(1));
    }

    #[test]
    fn test_playback_time_only_notifies_on_frame_change() {
        let mut session = session_with_media();
        let events = recorder(&mut session);

        session.set_playback_time(0.01);
        session.set_playback_time(0.1);
        session.set_playback_time(0.101);
        session.set_playback_time(99.0);

        assert_eq!(
            *events.borrow(),
            vec![SessionEvent::FrameChanged(3), SessionEvent::FrameChanged(300)]
        );
    }

    #[test]
    fn test_click_selects_then_moves_then_adds() {
        let mut session = session_with_media();
        session.ingest_tracked(vec![TracerPoint::new(6, 100.0, 100.0)]);

        assert_eq!(session.click(100.0, 100.0).unwrap(), ClickOutcome::Ignored);
        session.set_editing(true);

        let outcome = session.click(105.0, 108.0).unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Selected {
                index: 0,
                seek_secs: 0.2
            }
        );

        let outcome = session.click(300.0, 300.0).unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Moved {
                index: 0,
                point: TracerPoint::new(6, 300.0, 300.0)
            }
        );

        session.select(None).unwrap();
        let outcome = session.click(500.0, 50.0).unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Added {
                index: 1,
                point: TracerPoint::new(6, 500.0, 50.0)
            }
        );
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_add_point_at_center_selects_it() {
        let mut session = session_with_media();
        session.set_playback_time(1.0);
        let index = session.add_point_at_center().unwrap();
        assert_eq!(session.selected(), Some(index));
        assert_eq!(session.points()[index], TracerPoint::new(30, 640.0, 360.0));

        let mut empty = EditingSession::default();
        assert!(empty.add_point_at_center().is_err());
    }

    #[test]
    fn test_remove_shifts_selection() {
        let mut session = session_with_media();
        session.ingest_tracked(vec![
            TracerPoint::new(0, 0.0, 0.0),
            TracerPoint::new(3, 50.0, 0.0),
            TracerPoint::new(6, 100.0, 0.0),
        ]);
        session.select(Some(2)).unwrap();
        session.remove_point(0).unwrap();
        assert_eq!(session.selected(), Some(1));

        session.remove_selected().unwrap();
        assert_eq!(session.selected(), None);
        assert_eq!(session.points(), &[TracerPoint::new(3, 50.0, 0.0)]);
    }

    #[test]
    fn test_remove_updates_selection_before_points_changed() {
        let mut session = session_with_media();
        session.ingest_tracked(vec![
            TracerPoint::new(0, 0.0, 0.0),
            TracerPoint::new(3, 50.0, 0.0),
            TracerPoint::new(6, 100.0, 0.0),
        ]);
        session.select(Some(2)).unwrap();
        let events = recorder(&mut session);

        session.remove_point(0).unwrap();
        assert_eq!(
            *events.borrow(),
            vec![
                SessionEvent::SelectionChanged(Some(1)),
                SessionEvent::PointsChanged
            ]
        );
    }

    #[test]
    fn test_load_media_discards_timeline() {
        let mut session = session_with_media();
        session.add_point(TracerPoint::new(0, 1.0, 1.0));
        let events = recorder(&mut session);

        session.load_media(MediaInfo::new(640, 480));
        assert!(session.points().is_empty());
        assert!(session.history().is_empty());
        assert_eq!(*events.borrow(), vec![SessionEvent::Reset]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut session = session_with_media();
        let count = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&count);
        let id = session.subscribe(Box::new(move |_| *sink.borrow_mut() += 1));

        session.add_point(TracerPoint::new(0, 1.0, 1.0));
        assert!(session.unsubscribe(id));
        session.add_point(TracerPoint::new(1, 1.0, 1.0));
        assert_eq!(*count.borrow(), 1);
        assert!(!session.unsubscribe(id));
    }

    #[test]
    fn test_restore_rejects_mismatched_history() {
        let mut history = EditHistory::new();
        history.record(vec![TracerPoint::new(0, 1.0, 1.0)]);
        let state = SessionState {
            points: vec![TracerPoint::new(0, 2.0, 2.0)],
            history,
            ..SessionState::default()
        };
        assert!(EditingSession::restore(PlaybackDefaults::default(), state).is_err());
    }

    #[test]
    fn test_state_roundtrips_through_restore() {
        let mut session = session_with_media();
        session.ingest_tracked(vec![TracerPoint::new(0, 1.0, 1.0)]);
        session.add_point(TracerPoint::new(9, 2.0, 2.0));
        session.undo();
        session.set_playback_time(0.5);

        let restored =
            EditingSession::restore(PlaybackDefaults::default(), session.state()).unwrap();
        assert_eq!(restored.points(), session.points());
        assert_eq!(restored.history(), session.history());
        assert_eq!(restored.current_frame(), 15);
        assert!(restored.history().can_redo());
    }

    #[test]
    fn test_restore_seeds_history_from_saved_points() {
        let state = SessionState {
            media: Some(MediaInfo::new(1280, 720)),
            points: vec![TracerPoint::new(0, 1.0, 1.0)],
            ..SessionState::default()
        };
        let mut session = EditingSession::restore(PlaybackDefaults::default(), state).unwrap();
        assert_eq!(session.history().len(), 1);

        session.add_point(TracerPoint::new(3, 2.0, 2.0));
        assert_eq!(session.history().len(), 2);
        assert!(session.undo());
        assert_eq!(session.points(), &[TracerPoint::new(0, 1.0, 1.0)]);
    }

    #[test]
    fn test_restore_with_empty_timeline_leaves_history_empty() {
        let session =
            EditingSession::restore(PlaybackDefaults::default(), SessionState::default()).unwrap();
        assert!(session.history().is_empty());
    }
}
