use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LINES, DEFAULT_TITLE};
use crate::geometry::Coordinate;
use super::{Line, LineId, Station, StationId};

/// The aggregate root: every station and line of one map.
///
/// Mappings keep insertion order, which is the explicit line order used for
/// interline color ordering. `edit_seq` advances on every meaningful edit and
/// drives undo snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub stations: IndexMap<StationId, Station>,
    #[serde(default)]
    pub lines: IndexMap<LineId, Line>,
    #[serde(default, rename = "editSeq")]
    pub edit_seq: u64,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for System {
    /// A fresh system holding one empty red line with id "0"
    fn default() -> Self {
        let (name, color) = DEFAULT_LINES[0];
        let mut lines = IndexMap::new();
        lines.insert("0".to_string(), Line::new("0", name, color));
        Self {
            title: default_title(),
            stations: IndexMap::new(),
            lines,
            edit_seq: 0,
        }
    }
}

impl System {
    /// An untitled system with no lines
    #[must_use]
    pub fn empty() -> Self {
        Self {
            title: default_title(),
            stations: IndexMap::new(),
            lines: IndexMap::new(),
            edit_seq: 0,
        }
    }

    #[must_use]
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.get(id)
    }

    #[must_use]
    pub fn line(&self, id: &str) -> Option<&Line> {
        self.lines.get(id)
    }

    #[must_use]
    pub fn coordinate(&self, station_id: &str) -> Option<Coordinate> {
        self.stations.get(station_id).map(Station::coordinate)
    }

    /// Line ids in their stable insertion order
    #[must_use]
    pub fn line_order(&self) -> Vec<LineId> {
        self.lines.keys().cloned().collect()
    }

    /// Ids of the lines that pass through `station_id`
    #[must_use]
    pub fn lines_through(&self, station_id: &str) -> Vec<LineId> {
        self.lines
            .values()
            .filter(|line| line.contains_station(station_id))
            .map(|line| line.id.clone())
            .collect()
    }

    /// Remove station ids that no longer exist from every line.
    ///
    /// Returns the ids of the lines that were modified.
    pub fn repair_dangling_references(&mut self) -> Vec<LineId> {
        let stations = &self.stations;
        let mut repaired = Vec::new();

        for line in self.lines.values_mut() {
            let before = line.station_ids.len();
            line.station_ids.retain(|id| stations.contains_key(id));
            if line.station_ids.len() != before {
                tracing::warn!(
                    line_id = %line.id,
                    removed = before - line.station_ids.len(),
                    "removed dangling station references"
                );
                repaired.push(line.id.clone());
            }
        }

        repaired
    }
}
