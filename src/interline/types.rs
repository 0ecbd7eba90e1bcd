//! Core types for interline segments.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::models::StationId;

/// Undirected pair of adjacent stations, smaller id first.
///
/// Serialized as `"a|b"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SegmentKey {
    first: StationId,
    second: StationId,
}

impl SegmentKey {
    /// Build the canonical key for two adjacent stations in either order
    #[must_use]
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if b < a { (b, a) } else { (a, b) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    #[must_use]
    pub fn station_ids(&self) -> [StationId; 2] {
        [self.first.clone(), self.second.clone()]
    }

    #[must_use]
    pub fn contains(&self, station_id: &str) -> bool {
        self.first == station_id || self.second == station_id
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.first, self.second)
    }
}

impl From<SegmentKey> for String {
    fn from(key: SegmentKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for SegmentKey {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .split_once('|')
            .filter(|(a, b)| !a.is_empty() && !b.is_empty() && !b.contains('|'))
            .map(|(a, b)| SegmentKey::new(a, b))
            .ok_or_else(|| MapError::Serialization(format!("invalid segment key: {value:?}")))
    }
}

/// Lateral screen-space displacement `[dx, dy]` in pixels
pub type Offset = [f64; 2];

/// A station pair traversed by two or more line colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterlineSegment {
    #[serde(rename = "stationIds")]
    pub station_ids: [StationId; 2],
    /// Distinct colors in first-appearance order
    pub colors: Vec<String>,
    pub offsets: IndexMap<String, Offset>,
}

impl InterlineSegment {
    #[must_use]
    pub fn offset(&self, color: &str) -> Option<Offset> {
        self.offsets.get(color).copied()
    }

    /// Whether two segments carry the same colors, ignoring order
    #[must_use]
    pub fn same_colors(&self, other: &InterlineSegment) -> bool {
        if self.colors.len() != other.colors.len() {
            return false;
        }
        let mut ours: Vec<&String> = self.colors.iter().collect();
        let mut theirs: Vec<&String> = other.colors.iter().collect();
        ours.sort_unstable();
        theirs.sort_unstable();
        ours == theirs
    }
}

/// Every interlined segment of a system, keyed by station pair
pub type SegmentMap = IndexMap<SegmentKey, InterlineSegment>;
