//! Interline segments: adjacent station pairs shared by two or more lines.
//!
//! The builder is a pure function of the system and an explicit line order.
//! Color order within a segment is first appearance in that line order, and
//! offsets depend only on that color order and the segment geometry, so
//! rebuilding after an unrelated edit leaves untouched segments identical.

mod diff;
mod features;
mod offsets;
mod types;

pub use diff::SegmentChanges;
pub use features::{group_by_offset, segment_features, SegmentFeature};
pub use offsets::{assign_offsets, lateral_slot, offset_key};
pub use types::{InterlineSegment, Offset, SegmentKey, SegmentMap};

use std::collections::HashSet;

use indexmap::IndexMap;

#[allow(unused_imports)]
use crate::logging::log;
use crate::models::{EngineSettings, LineId, System};

/// Build every interlined segment with the default line width and grid
#[must_use]
pub fn build_interline_segments(system: &System, line_ids: &[LineId]) -> SegmentMap {
    build_interline_segments_with(system, line_ids, &EngineSettings::default())
}

/// Build every interlined segment.
///
/// Lines are visited in `line_ids` order; unknown and repeated ids are
/// skipped. Pairs naming a station missing from the system are skipped.
#[must_use]
pub fn build_interline_segments_with(system: &System, line_ids: &[LineId], settings: &EngineSettings) -> SegmentMap {
    let mut colors_by_key: IndexMap<SegmentKey, Vec<String>> = IndexMap::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for line_id in line_ids {
        if !visited.insert(line_id.as_str()) {
            continue;
        }
        let Some(line) = system.line(line_id) else {
            continue;
        };

        for (a, b) in line.adjacent_pairs() {
            if a == b || system.station(a).is_none() || system.station(b).is_none() {
                continue;
            }
            let colors = colors_by_key.entry(SegmentKey::new(a, b)).or_default();
            if !colors.contains(&line.color) {
                colors.push(line.color.clone());
            }
        }
    }

    let mut segments = SegmentMap::new();
    for (key, colors) in colors_by_key {
        if colors.len() < 2 {
            continue;
        }
        let (Some(from), Some(to)) = (system.coordinate(key.first()), system.coordinate(key.second())) else {
            continue;
        };

        let offsets = assign_offsets(&colors, from, to, settings.line_width, settings.offset_grid);
        segments.insert(
            key.clone(),
            InterlineSegment {
                station_ids: key.station_ids(),
                colors,
                offsets,
            },
        );
    }

    log!("Built {} interline segments from {} lines", segments.len(), visited.len());
    segments
}

/// Sorted keys added, removed or recolored between two complete segment maps
#[must_use]
pub fn diff_interline_segments(previous: &SegmentMap, next: &SegmentMap) -> Vec<SegmentKey> {
    SegmentChanges::between(previous, next).keys()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Line, Station};

    fn add_line(system: &mut System, id: &str, color: &str, stations: &[&str]) {
        system.lines.insert(
            id.to_string(),
            Line::new(id, id, color).with_stations(stations.iter().copied()),
        );
    }

    /// Stations 1..=5 running north along the prime meridian
    fn corridor() -> System {
        let mut system = System::empty();
        for i in 1..=5 {
            let id = i.to_string();
            system.stations.insert(id.clone(), Station::new(id.as_str(), f64::from(i), 0.0, id.as_str()));
        }
        system
    }

    fn thin() -> EngineSettings {
        EngineSettings {
            line_width: 1.0,
            ..EngineSettings::default()
        }
    }

    #[test]
    fn test_single_line_pairs_are_not_emitted() {
        let mut system = corridor();
        add_line(&mut system, "0", "red", &["1", "2", "3", "4"]);
        add_line(&mut system, "1", "blue", &["3", "4", "5"]);

        let segments = build_interline_segments(&system, &system.line_order());
        assert_eq!(segments.keys().map(ToString::to_string).collect::<Vec<_>>(), vec!["3|4"]);
    }

    #[test]
    fn test_three_colors_offsets_follow_line_order() {
        let mut system = corridor();
        add_line(&mut system, "a", "red", &["1", "2"]);
        add_line(&mut system, "b", "green", &["2", "1"]);
        add_line(&mut system, "c", "blue", &["1", "2"]);

        let order: Vec<LineId> = ["a", "b", "c"].iter().map(ToString::to_string).collect();
        let segments = build_interline_segments_with(&system, &order, &thin());
        let segment = &segments[&SegmentKey::new("1", "2")];

        assert_eq!(segment.colors, vec!["red", "green", "blue"]);
        assert_eq!(segment.offset("red"), Some([-1.0, 0.0]));
        assert_eq!(segment.offset("green"), Some([0.0, 0.0]));
        assert_eq!(segment.offset("blue"), Some([1.0, 0.0]));
    }

    #[test]
    fn test_explicit_order_beats_map_order() {
        let mut system = corridor();
        add_line(&mut system, "c", "blue", &["1", "2"]);
        add_line(&mut system, "a", "red", &["1", "2"]);
        add_line(&mut system, "b", "green", &["1", "2"]);

        let order: Vec<LineId> = ["a", "b", "c"].iter().map(ToString::to_string).collect();
        let segments = build_interline_segments_with(&system, &order, &thin());
        assert_eq!(segments[&SegmentKey::new("1", "2")].colors, vec!["red", "green", "blue"]);
    }

    #[test]
    fn test_loop_contributes_color_once() {
        let mut system = corridor();
        add_line(&mut system, "0", "red", &["1", "2", "1"]);
        assert!(build_interline_segments(&system, &system.line_order()).is_empty());

        add_line(&mut system, "1", "red", &["1", "2"]);
        assert!(build_interline_segments(&system, &system.line_order()).is_empty());

        add_line(&mut system, "2", "blue", &["2", "1"]);
        let segments = build_interline_segments(&system, &system.line_order());
        assert_eq!(segments[&SegmentKey::new("1", "2")].colors, vec!["red", "blue"]);
    }

    #[test]
    fn test_unknown_and_repeated_line_ids_are_skipped() {
        let mut system = corridor();
        add_line(&mut system, "0", "red", &["1", "2"]);
        add_line(&mut system, "1", "blue", &["1", "2"]);

        let order: Vec<LineId> = ["1", "ghost", "1", "0"].iter().map(ToString::to_string).collect();
        let segments = build_interline_segments(&system, &order);
        assert_eq!(segments[&SegmentKey::new("1", "2")].colors, vec!["blue", "red"]);
    }

    #[test]
    fn test_missing_station_pairs_are_skipped() {
        let mut system = corridor();
        add_line(&mut system, "0", "red", &["1", "ghost", "2"]);
        add_line(&mut system, "1", "blue", &["1", "ghost", "2"]);
        assert!(build_interline_segments(&system, &system.line_order()).is_empty());
    }

    #[test]
    fn test_rebuild_is_identical() {
        let mut system = corridor();
        add_line(&mut system, "0", "red", &["1", "2", "3", "4", "5"]);
        add_line(&mut system, "1", "blue", &["5", "4", "3"]);
        add_line(&mut system, "2", "green", &["2", "3", "4"]);

        let first = build_interline_segments(&system, &system.line_order());
        let second = build_interline_segments(&system, &system.line_order());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unrelated_edit_leaves_offsets_untouched() {
        let mut system = corridor();
        add_line(&mut system, "0", "red", &["1", "2", "3"]);
        add_line(&mut system, "1", "blue", &["1", "2"]);
        let before = build_interline_segments(&system, &system.line_order());

        add_line(&mut system, "2", "green", &["4", "5"]);
        add_line(&mut system, "3", "orange", &["4", "5"]);
        let after = build_interline_segments(&system, &system.line_order());

        let key = SegmentKey::new("1", "2");
        assert_eq!(before[&key], after[&key]);
        assert_eq!(diff_interline_segments(&before, &after), vec![SegmentKey::new("4", "5")]);
    }

    #[test]
    fn test_offsets_do_not_depend_on_travel_direction() {
        let mut forward = corridor();
        add_line(&mut forward, "0", "red", &["1", "2"]);
        add_line(&mut forward, "1", "blue", &["1", "2"]);

        let mut backward = corridor();
        add_line(&mut backward, "0", "red", &["2", "1"]);
        add_line(&mut backward, "1", "blue", &["2", "1"]);

        assert_eq!(
            build_interline_segments(&forward, &forward.line_order()),
            build_interline_segments(&backward, &backward.line_order())
        );
    }
}
