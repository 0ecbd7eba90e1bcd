/// ID allocation utilities
///
/// Station and line ids are decimal strings handed out from monotonically
/// increasing counters stored alongside the map. Ids are never reused, even
/// after the entity they named is deleted.
use serde::{Deserialize, Serialize};

use super::{LineId, StationId};

/// Next-id counters for a system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(rename = "nextStationId")]
    pub next_station_id: String,
    #[serde(rename = "nextLineId")]
    pub next_line_id: String,
}

impl Default for Meta {
    /// A fresh system starts with line "0" already present
    fn default() -> Self {
        Self {
            next_station_id: "0".to_string(),
            next_line_id: "1".to_string(),
        }
    }
}

/// Increment a decimal id string. Unparseable counters restart at "0".
///
/// Edits reconcile the counters against the ids in use before allocating, so
/// a restarted counter never hands out a taken id.
#[must_use]
pub fn increment_id(id: &str) -> String {
    id.trim()
        .parse::<u64>()
        .map_or_else(|_| "0".to_string(), |n| n.saturating_add(1).to_string())
}

impl Meta {
    /// Take the next station id, returning it with the advanced counters
    #[must_use]
    pub fn allocate_station_id(&self) -> (StationId, Meta) {
        let id = self.next_station_id.clone();
        let meta = Meta {
            next_station_id: increment_id(&id),
            next_line_id: self.next_line_id.clone(),
        };
        (id, meta)
    }

    /// Take the next line id, returning it with the advanced counters
    #[must_use]
    pub fn allocate_line_id(&self) -> (LineId, Meta) {
        let id = self.next_line_id.clone();
        let meta = Meta {
            next_station_id: self.next_station_id.clone(),
            next_line_id: increment_id(&id),
        };
        (id, meta)
    }

    /// Raise the counters past every id already in use.
    ///
    /// Documents written by older clients can carry counters that lag behind
    /// their contents.
    #[must_use]
    pub fn reconciled<'a, S, L>(&self, station_ids: S, line_ids: L) -> Meta
    where
        S: IntoIterator<Item = &'a StationId>,
        L: IntoIterator<Item = &'a LineId>,
    {
        fn floor<'a>(current: &str, ids: impl IntoIterator<Item = &'a String>) -> String {
            let current_value = current.trim().parse::<u64>().unwrap_or(0);
            ids.into_iter()
                .filter_map(|id| id.parse::<u64>().ok())
                .map(|n| n.saturating_add(1))
                .fold(current_value, u64::max)
                .to_string()
        }

        Meta {
            next_station_id: floor(&self.next_station_id, station_ids),
            next_line_id: floor(&self.next_line_id, line_ids),
        }
    }
}
