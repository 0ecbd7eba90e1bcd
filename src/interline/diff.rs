use serde::{Deserialize, Serialize};

use super::types::{SegmentKey, SegmentMap};

/// Segment keys that differ between two complete segment maps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentChanges {
    pub added: Vec<SegmentKey>,
    pub removed: Vec<SegmentKey>,
    /// Present in both maps with a different color set
    pub changed: Vec<SegmentKey>,
}

impl SegmentChanges {
    /// Compare two snapshots. Each list is sorted by key.
    #[must_use]
    pub fn between(previous: &SegmentMap, next: &SegmentMap) -> Self {
        let mut changes = Self::default();

        for (key, segment) in next {
            match previous.get(key) {
                None => changes.added.push(key.clone()),
                Some(old) if !old.same_colors(segment) => changes.changed.push(key.clone()),
                Some(_) => {}
            }
        }
        changes.removed = previous
            .keys()
            .filter(|key| !next.contains_key(*key))
            .cloned()
            .collect();

        changes.added.sort();
        changes.removed.sort();
        changes.changed.sort();
        changes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    /// Every reported key in sorted order
    #[must_use]
    pub fn keys(&self) -> Vec<SegmentKey> {
        let mut keys: Vec<SegmentKey> = self
            .added
            .iter()
            .chain(&self.removed)
            .chain(&self.changed)
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}
