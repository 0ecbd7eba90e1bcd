//! Track length, station spacing and system-wide summary figures.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::{distance_miles, path_length_miles, Coordinate};
use crate::models::{classify_spacing, EngineSettings, Line, LineId, SpacingLevel, Station, StationId, System};
use crate::sections::{canonical_section, partition_sections};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackStatistics {
    /// Total length of unique track in miles
    #[serde(rename = "trackLength")]
    pub track_length: f64,
    /// Mean length of a unique section in miles
    #[serde(rename = "avgSpacing")]
    pub avg_spacing: Option<f64>,
    /// Key of the spacing level the system falls into
    pub level: Option<String>,
    /// Number of unique sections that contributed to the length
    #[serde(rename = "numSections")]
    pub num_sections: usize,
}

/// Compute track statistics over every line.
///
/// Each section is canonicalized so that shared or back-and-forth track is
/// only measured once. Sections shorter than two stations, or naming a
/// station missing from `stations`, are skipped.
#[must_use]
pub fn compute_track_statistics(
    lines: &IndexMap<LineId, Line>,
    stations: &IndexMap<StationId, Station>,
    levels: &[SpacingLevel],
) -> TrackStatistics {
    let mut seen: HashSet<String> = HashSet::new();
    let mut track_length = 0.0;
    let mut num_sections = 0;

    for line in lines.values() {
        for section in partition_sections(line, stations) {
            if section.len() < 2 {
                continue;
            }

            let canonical = canonical_section(&section);
            let key = canonical.join("|");
            if seen.contains(&key) {
                continue;
            }

            let Some(path) = canonical
                .iter()
                .map(|id| stations.get(id).map(Station::coordinate))
                .collect::<Option<Vec<Coordinate>>>()
            else {
                tracing::warn!(line_id = %line.id, section = %key, "skipping section with unknown station");
                continue;
            };

            track_length += path_length_miles(&path);
            num_sections += 1;
            seen.insert(key);
        }
    }

    let (avg_spacing, level) = if track_length > 0.0 && num_sections > 0 {
        #[allow(clippy::cast_precision_loss)]
        let avg = track_length / num_sections as f64;
        (Some(avg), classify_spacing(levels, avg).map(|l| l.key.clone()))
    } else {
        (None, None)
    };

    TrackStatistics {
        track_length,
        avg_spacing,
        level,
        num_sections,
    }
}

/// Aggregate figures stored with a system for listing and search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSummary {
    #[serde(rename = "numStations")]
    pub num_stations: usize,
    #[serde(rename = "numWaypoints")]
    pub num_waypoints: usize,
    #[serde(rename = "numLines")]
    pub num_lines: usize,
    /// Mean position of the non-waypoint stations
    pub centroid: Option<Coordinate>,
    /// Distance from the centroid to the farthest bounding-box corner, in miles
    #[serde(rename = "maxDist")]
    pub max_dist: Option<f64>,
    /// Mean distance from the centroid to each station, in miles
    #[serde(rename = "avgDist")]
    pub avg_dist: Option<f64>,
    #[serde(flatten)]
    pub track: TrackStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    pub centroid: Coordinate,
    pub max_dist: f64,
    pub avg_dist: f64,
}

/// Centroid and spread of the non-waypoint stations, `None` when there are none
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn geo_extent(stations: &IndexMap<StationId, Station>) -> Option<GeoExtent> {
    let points: Vec<Coordinate> = stations
        .values()
        .filter(|s| !s.is_waypoint)
        .map(Station::coordinate)
        .collect();

    if points.is_empty() {
        return None;
    }

    let count = points.len() as f64;
    let centroid = Coordinate::new(
        points.iter().map(|p| p.lat).sum::<f64>() / count,
        points.iter().map(|p| p.lng).sum::<f64>() / count,
    );

    let max_lat = points.iter().map(|p| p.lat).fold(f64::NEG_INFINITY, f64::max);
    let min_lat = points.iter().map(|p| p.lat).fold(f64::INFINITY, f64::min);
    let max_lng = points.iter().map(|p| p.lng).fold(f64::NEG_INFINITY, f64::max);
    let min_lng = points.iter().map(|p| p.lng).fold(f64::INFINITY, f64::min);

    let corners = [
        Coordinate::new(max_lat, min_lng),
        Coordinate::new(max_lat, max_lng),
        Coordinate::new(min_lat, max_lng),
        Coordinate::new(min_lat, min_lng),
    ];
    let max_dist = corners
        .iter()
        .map(|c| distance_miles(centroid, *c))
        .fold(0.0, f64::max);
    let avg_dist = points.iter().map(|p| distance_miles(centroid, *p)).sum::<f64>() / count;

    Some(GeoExtent {
        centroid,
        max_dist,
        avg_dist,
    })
}

#[must_use]
pub fn summarize_system(system: &System, settings: &EngineSettings) -> SystemSummary {
    let stations = &system.stations;
    let num_waypoints = stations.values().filter(|s| s.is_waypoint).count();
    let extent = geo_extent(stations);

    SystemSummary {
        num_stations: stations.len() - num_waypoints,
        num_waypoints,
        num_lines: system.lines.len(),
        centroid: extent.map(|e| e.centroid),
        max_dist: extent.map(|e| e.max_dist),
        avg_dist: extent.map(|e| e.avg_dist),
        track: compute_track_statistics(&system.lines, stations, &settings.levels),
    }
}
