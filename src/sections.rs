//! Section partitioning of lines.
//!
//! A section is a run of station ids from one line bounded by real
//! (non-waypoint) stations or by the ends of the line.

use indexmap::IndexMap;

use crate::models::{Line, Station, StationId};

/// Split a line into sections.
///
/// Ids are accumulated in travel order; a section closes at every
/// non-waypoint station after the first entry and at the last entry, and the
/// next section starts from the id that closed it. Ids missing from
/// `stations` are treated as real stations so they still bound sections.
/// Lines with fewer than two entries have no usable sections.
#[must_use]
pub fn partition_sections(line: &Line, stations: &IndexMap<StationId, Station>) -> Vec<Vec<StationId>> {
    let ids = &line.station_ids;
    if ids.len() < 2 {
        return Vec::new();
    }

    let last = ids.len() - 1;
    let mut sections = Vec::new();
    let mut section: Vec<StationId> = Vec::new();

    for (i, id) in ids.iter().enumerate() {
        section.push(id.clone());

        if i == 0 {
            continue;
        }

        let is_waypoint = stations.get(id).is_some_and(|s| s.is_waypoint);
        if !is_waypoint || i == last {
            sections.push(std::mem::replace(&mut section, vec![id.clone()]));
        }
    }

    sections
}

/// Direction-agnostic form of a section: the lexicographically smaller of the
/// sequence and its reverse, so the endpoint that sorts first leads
#[must_use]
pub fn canonical_section(section: &[StationId]) -> Vec<StationId> {
    let reversed: Vec<StationId> = section.iter().rev().cloned().collect();
    if reversed.as_slice() < section {
        reversed
    } else {
        section.to_vec()
    }
}

/// `id|id|id` key of a section's canonical form
#[must_use]
pub fn section_key(section: &[StationId]) -> String {
    canonical_section(section).join("|")
}
