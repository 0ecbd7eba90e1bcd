//! Edit operations on a system.
//!
//! Every operation takes the current `System` and `Meta` by reference and
//! returns new values, leaving the inputs untouched. Successful edits advance
//! `edit_seq`, which is what history snapshots key on.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_STATION_NAME, FORK_SUFFIX};
use crate::error::{MapError, Result};
use crate::geometry::{normalize_coordinate, RawCoordinate};
use crate::insertion::resolve_insertion_index;
#[allow(unused_imports)]
use crate::logging::log;
use crate::models::{next_default_line, Line, LineId, LineMode, Meta, Station, StationId, System};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EditOp {
    /// Place a new station, optionally adding it to a line at the nearest position
    AddStation {
        lat: RawCoordinate,
        lng: RawCoordinate,
        #[serde(default)]
        is_waypoint: bool,
        #[serde(default)]
        line_id: Option<LineId>,
    },
    UpdateStationInfo {
        station_id: StationId,
        name: Option<String>,
        info: Option<String>,
    },
    /// Name found by a place lookup; does not advance `edit_seq`
    ApplySuggestedName { station_id: StationId, name: String },
    DeleteStation { station_id: StationId },
    ConvertToWaypoint { station_id: StationId },
    ConvertToStation { station_id: StationId },
    /// `position` of `None` resolves the nearest insertion point
    AddStationToLine {
        line_id: LineId,
        station_id: StationId,
        #[serde(default)]
        position: Option<usize>,
    },
    RemoveStationFromLine { line_id: LineId, station_id: StationId },
    RemoveWaypointsFromLine { line_id: LineId },
    ReverseLine { line_id: LineId },
    AddLine {
        #[serde(default)]
        station_ids: Vec<StationId>,
    },
    UpdateLine {
        line_id: LineId,
        name: Option<String>,
        color: Option<String>,
        mode: Option<LineMode>,
    },
    DuplicateLine { line_id: LineId },
    DeleteLine { line_id: LineId },
    SetTitle { title: String },
}

/// What an edit touched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub station_ids: Vec<StationId>,
    pub line_ids: Vec<LineId>,
    /// Whether interline segments may have changed
    pub refresh_segments: bool,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.station_ids.is_empty() && self.line_ids.is_empty() && !self.refresh_segments
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub system: System,
    pub meta: Meta,
    pub changed: ChangeSet,
    /// Id of the station or line the edit created
    pub created: Option<String>,
}

/// Apply one edit.
///
/// # Errors
/// `UnknownStation` / `UnknownLine` for ids missing from `system`,
/// `DuplicateStation` when adding a station a line already holds without
/// closing a loop, and `InvalidCoordinate` for a bad new station position.
pub fn apply_edit(system: &System, meta: &Meta, op: EditOp) -> Result<EditOutcome> {
    let mut next = system.clone();
    // Counters that lag behind the ids in use would hand out a taken id
    let mut next_meta = meta.reconciled(system.stations.keys(), system.lines.keys());
    let mut changed = ChangeSet::default();
    let mut created = None;
    let mut advance = true;

    match op {
        EditOp::AddStation {
            lat,
            lng,
            is_waypoint,
            line_id,
        } => {
            let lat = normalize_coordinate("lat", &lat)?;
            let lng = normalize_coordinate("lng", &lng)?;

            let (station_id, advanced) = next_meta.allocate_station_id();
            let station = if is_waypoint {
                Station::waypoint(station_id.clone(), lat, lng)
            } else {
                Station::new(station_id.clone(), lat, lng, DEFAULT_STATION_NAME)
            };

            let position = match &line_id {
                Some(line_id) => Some(resolve_insertion_index(require_line(&next, line_id)?, &next.stations, &station)),
                None => None,
            };
            next_meta = advanced;

            if let (Some(line_id), Some(position)) = (line_id, position) {
                insert_into_line(&mut next, &line_id, &station_id, position);
                changed.line_ids.push(line_id);
                changed.refresh_segments = true;
            }
            next.stations.insert(station_id.clone(), station);
            changed.station_ids.push(station_id.clone());
            created = Some(station_id);
        }

        EditOp::UpdateStationInfo { station_id, name, info } => {
            let station = station_mut(&mut next, &station_id)?;
            if station.is_waypoint {
                return Ok(unchanged(system, meta));
            }
            if name.is_some() {
                station.name = name;
            }
            if info.is_some() {
                station.info = info;
            }
            changed.station_ids.push(station_id);
        }

        EditOp::ApplySuggestedName { station_id, name } => {
            // The station may have been deleted or converted while the lookup ran
            match next.stations.get_mut(&station_id) {
                Some(station) if !station.is_waypoint => station.name = Some(name),
                _ => return Ok(unchanged(system, meta)),
            }
            changed.station_ids.push(station_id);
            advance = false;
        }

        EditOp::DeleteStation { station_id } => {
            if next.stations.shift_remove(&station_id).is_none() {
                return Err(MapError::UnknownStation(station_id));
            }
            for line in next.lines.values_mut() {
                let before = line.station_ids.len();
                line.station_ids.retain(|id| *id != station_id);
                if line.station_ids.len() != before {
                    changed.line_ids.push(line.id.clone());
                }
            }
            changed.refresh_segments = !changed.line_ids.is_empty();
            changed.station_ids.push(station_id);
        }

        EditOp::ConvertToWaypoint { station_id } => {
            let station = station_mut(&mut next, &station_id)?;
            station.is_waypoint = true;
            station.name = None;
            station.info = None;
            changed.line_ids = next.lines_through(&station_id);
            changed.station_ids.push(station_id);
        }

        EditOp::ConvertToStation { station_id } => {
            let station = station_mut(&mut next, &station_id)?;
            station.is_waypoint = false;
            station.name = Some(DEFAULT_STATION_NAME.to_string());
            changed.line_ids = next.lines_through(&station_id);
            changed.station_ids.push(station_id);
        }

        EditOp::AddStationToLine {
            line_id,
            station_id,
            position,
        } => {
            let line = require_line(&next, &line_id)?;
            let station = next
                .stations
                .get(&station_id)
                .ok_or_else(|| MapError::UnknownStation(station_id.clone()))?;

            let position = position
                .unwrap_or_else(|| resolve_insertion_index(line, &next.stations, station))
                .min(line.station_ids.len());

            if line.contains_station(&station_id) && !closes_loop(line, &station_id, position) {
                return Err(MapError::DuplicateStation { line_id, station_id });
            }

            insert_into_line(&mut next, &line_id, &station_id, position);
            changed.line_ids.push(line_id);
            changed.station_ids.push(station_id);
            changed.refresh_segments = true;
        }

        EditOp::RemoveStationFromLine { line_id, station_id } => {
            let line = line_mut(&mut next, &line_id)?;
            if !line.contains_station(&station_id) {
                return Ok(unchanged(system, meta));
            }
            line.station_ids.retain(|id| *id != station_id);
            changed.line_ids.push(line_id);
            changed.station_ids.push(station_id);
            changed.refresh_segments = true;
        }

        EditOp::RemoveWaypointsFromLine { line_id } => {
            let stations = &next.stations;
            let line = next
                .lines
                .get_mut(&line_id)
                .ok_or_else(|| MapError::UnknownLine(line_id.clone()))?;

            let mut removed = Vec::new();
            line.station_ids.retain(|id| {
                let is_waypoint = stations.get(id).is_some_and(|s| s.is_waypoint);
                if is_waypoint && !removed.contains(id) {
                    removed.push(id.clone());
                }
                !is_waypoint
            });

            changed.station_ids = removed;
            changed.line_ids.push(line_id);
            changed.refresh_segments = true;
        }

        EditOp::ReverseLine { line_id } => {
            line_mut(&mut next, &line_id)?.station_ids.reverse();
            changed.line_ids.push(line_id);
        }

        EditOp::AddLine { station_ids } => {
            if let Some(missing) = station_ids.iter().find(|id| !next.stations.contains_key(*id)) {
                return Err(MapError::UnknownStation(missing.clone()));
            }

            let (line_id, advanced) = next_meta.allocate_line_id();
            next_meta = advanced;
            let (name, color) = next_default_line(next.lines.values().map(|l| l.color.as_str()), next.lines.len());

            changed.refresh_segments = station_ids.len() > 1;
            changed.station_ids.clone_from(&station_ids);
            next.lines.insert(
                line_id.clone(),
                Line::new(line_id.clone(), name, color).with_stations(station_ids),
            );
            changed.line_ids.push(line_id.clone());
            created = Some(line_id);
        }

        EditOp::UpdateLine {
            line_id,
            name,
            color,
            mode,
        } => {
            let line = line_mut(&mut next, &line_id)?;
            if let Some(name) = name {
                line.name = name;
            }
            if let Some(color) = color {
                changed.refresh_segments = color != line.color;
                line.color = color;
            }
            if let Some(mode) = mode {
                line.mode = mode;
            }
            changed.line_ids.push(line_id);
        }

        EditOp::DuplicateLine { line_id } => {
            let original = require_line(&next, &line_id)?;
            let (fork_id, advanced) = next_meta.allocate_line_id();
            next_meta = advanced;

            let mut fork = original.clone();
            fork.id.clone_from(&fork_id);
            fork.name = format!("{}{FORK_SUFFIX}", original.name);

            next.lines.insert(fork_id.clone(), fork);
            changed.line_ids.push(fork_id.clone());
            created = Some(fork_id);
        }

        EditOp::DeleteLine { line_id } => {
            let line = next
                .lines
                .shift_remove(&line_id)
                .ok_or_else(|| MapError::UnknownLine(line_id.clone()))?;
            for station_id in line.station_ids {
                if !changed.station_ids.contains(&station_id) {
                    changed.station_ids.push(station_id);
                }
            }
            changed.line_ids.push(line_id);
            changed.refresh_segments = true;
        }

        EditOp::SetTitle { title } => {
            next.title = title;
        }
    }

    if advance {
        next.edit_seq += 1;
    }
    log!(
        "Edit applied: seq {} ({} stations, {} lines changed)",
        next.edit_seq,
        changed.station_ids.len(),
        changed.line_ids.len()
    );

    Ok(EditOutcome {
        system: next,
        meta: next_meta,
        changed,
        created,
    })
}

fn unchanged(system: &System, meta: &Meta) -> EditOutcome {
    EditOutcome {
        system: system.clone(),
        meta: meta.clone(),
        changed: ChangeSet::default(),
        created: None,
    }
}

fn require_line<'a>(system: &'a System, line_id: &str) -> Result<&'a Line> {
    system
        .lines
        .get(line_id)
        .ok_or_else(|| MapError::UnknownLine(line_id.to_string()))
}

fn line_mut<'a>(system: &'a mut System, line_id: &str) -> Result<&'a mut Line> {
    system
        .lines
        .get_mut(line_id)
        .ok_or_else(|| MapError::UnknownLine(line_id.to_string()))
}

fn station_mut<'a>(system: &'a mut System, station_id: &str) -> Result<&'a mut Station> {
    system
        .stations
        .get_mut(station_id)
        .ok_or_else(|| MapError::UnknownStation(station_id.to_string()))
}

/// Adding an id the line already holds is allowed only when it turns an open
/// line into a loop
fn closes_loop(line: &Line, station_id: &str, position: usize) -> bool {
    let ids = &line.station_ids;
    if ids.len() < 2 || line.is_circular() {
        return false;
    }
    (position == ids.len() && ids[0] == station_id) || (position == 0 && ids[ids.len() - 1] == station_id)
}

fn insert_into_line(system: &mut System, line_id: &str, station_id: &str, position: usize) {
    if let Some(line) = system.lines.get_mut(line_id) {
        let position = position.min(line.station_ids.len());
        line.station_ids.insert(position, station_id.to_string());
    }
}
