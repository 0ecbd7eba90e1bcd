//! A single editor's working state.
//!
//! The session owns the current system, its id counters, the undo history and
//! the last complete segment map. Segments are only ever replaced as a whole,
//! so the differ always compares two full snapshots.

use crate::edit::{apply_edit, ChangeSet, EditOp};
use crate::error::Result;
use crate::interline::{
    build_interline_segments_with, diff_interline_segments, segment_features, SegmentFeature, SegmentKey, SegmentMap,
};
#[allow(unused_imports)]
use crate::logging::log;
use crate::models::{EngineSettings, Meta, System, UndoManager};
use crate::track_stats::{summarize_system, SystemSummary};

/// Result of applying an edit through a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub changed: ChangeSet,
    /// Segment keys the map layer must redraw
    pub segments: Vec<SegmentKey>,
    pub created: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    system: System,
    meta: Meta,
    history: UndoManager,
    segments: SegmentMap,
    settings: EngineSettings,
}

impl EditSession {
    #[must_use]
    pub fn new(system: System, meta: Meta, settings: EngineSettings) -> Self {
        let meta = meta.reconciled(system.stations.keys(), system.lines.keys());
        let mut history = UndoManager::new(settings.max_history);
        history.record(&system);
        let segments = build_interline_segments_with(&system, &system.line_order(), &settings);

        Self {
            system,
            meta,
            history,
            segments,
            settings,
        }
    }

    #[must_use]
    pub fn system(&self) -> &System {
        &self.system
    }

    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    #[must_use]
    pub fn segments(&self) -> &SegmentMap {
        &self.segments
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Apply an edit, record history and refresh segments when needed.
    ///
    /// The returned segment keys cover membership changes reported by the
    /// differ plus segments that kept their colors but moved slots, such as
    /// after deleting the line that put a color first.
    ///
    /// # Errors
    /// Propagates the edit's error; the session is left unchanged.
    pub fn apply(&mut self, op: EditOp) -> Result<SessionUpdate> {
        let outcome = apply_edit(&self.system, &self.meta, op)?;

        self.system = outcome.system;
        self.meta = outcome.meta;
        self.history.record(&self.system);

        let segments = if outcome.changed.refresh_segments {
            self.rebuild_segments()
        } else {
            Vec::new()
        };

        Ok(SessionUpdate {
            changed: outcome.changed,
            segments,
            created: outcome.created,
        })
    }

    /// Restore the previous snapshot, returning the segment keys to redraw
    pub fn undo(&mut self) -> Option<Vec<SegmentKey>> {
        let previous = self.history.undo(self.system.clone())?;
        self.system = previous;
        log!("Undo to edit seq {}", self.system.edit_seq);
        Some(self.rebuild_segments())
    }

    /// Reapply an undone snapshot, returning the segment keys to redraw
    pub fn redo(&mut self) -> Option<Vec<SegmentKey>> {
        let next = self.history.redo()?;
        self.system = next;
        log!("Redo to edit seq {}", self.system.edit_seq);
        Some(self.rebuild_segments())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn summary(&self) -> SystemSummary {
        summarize_system(&self.system, &self.settings)
    }

    /// Render features for the given segment keys of the current snapshot
    #[must_use]
    pub fn features(&self, keys: &[SegmentKey]) -> Vec<SegmentFeature> {
        segment_features(&self.system, &self.segments, keys)
    }

    #[must_use]
    pub fn into_parts(self) -> (System, Meta) {
        (self.system, self.meta)
    }

    fn rebuild_segments(&mut self) -> Vec<SegmentKey> {
        let next = build_interline_segments_with(&self.system, &self.system.line_order(), &self.settings);
        let mut changed = diff_interline_segments(&self.segments, &next);

        // Same colors in a new order keep membership but swap offsets
        for (key, segment) in &next {
            let shifted = self
                .segments
                .get(key)
                .is_some_and(|old| old.same_colors(segment) && old.offsets != segment.offsets);
            if shifted {
                changed.push(key.clone());
            }
        }
        changed.sort();

        self.segments = next;
        changed
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(System::default(), Meta::default(), EngineSettings::default())
    }
}
