//! Render features for interlined segments.
//!
//! The map layer draws one layer per distinct offset, so features are emitted
//! per color and then bucketed by their offset key.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::offsets::offset_key;
use super::types::{Offset, SegmentKey, SegmentMap};
use crate::models::System;

/// One colored strand of an interlined segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentFeature {
    pub key: SegmentKey,
    pub color: String,
    /// Endpoints as `[lng, lat]`
    pub coordinates: [[f64; 2]; 2],
    pub offset: Offset,
}

/// Features for the given segment keys.
///
/// Keys missing from `segments`, or whose stations are missing from
/// `system`, produce nothing.
#[must_use]
pub fn segment_features(system: &System, segments: &SegmentMap, keys: &[SegmentKey]) -> Vec<SegmentFeature> {
    let mut features = Vec::new();

    for key in keys {
        let Some(segment) = segments.get(key) else {
            continue;
        };
        let (Some(a), Some(b)) = (system.coordinate(key.first()), system.coordinate(key.second())) else {
            continue;
        };

        for color in &segment.colors {
            let Some(offset) = segment.offset(color) else {
                continue;
            };
            features.push(SegmentFeature {
                key: key.clone(),
                color: color.clone(),
                coordinates: [a.to_lng_lat(), b.to_lng_lat()],
                offset,
            });
        }
    }

    features
}

/// Bucket features by `"dx|dy"` offset key, in first-seen order
#[must_use]
pub fn group_by_offset(features: Vec<SegmentFeature>) -> IndexMap<String, Vec<SegmentFeature>> {
    let mut groups: IndexMap<String, Vec<SegmentFeature>> = IndexMap::new();
    for feature in features {
        groups.entry(offset_key(feature.offset)).or_default().push(feature);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interline::build_interline_segments;
    use crate::models::{Line, Station};

    fn system() -> System {
        let mut system = System::empty();
        for (id, lat) in [("1", 0.0), ("2", 1.0), ("3", 2.0)] {
            system.stations.insert(id.to_string(), Station::new(id, lat, 0.0, id));
        }
        system.lines.insert(
            "0".to_string(),
            Line::new("0", "Red", "red").with_stations(["1", "2", "3"]),
        );
        system.lines.insert(
            "1".to_string(),
            Line::new("1", "Blue", "blue").with_stations(["1", "2", "3"]),
        );
        system
    }

    #[test]
    fn test_features_per_color() {
        let system = system();
        let segments = build_interline_segments(&system, &system.line_order());
        let keys: Vec<SegmentKey> = segments.keys().cloned().collect();
        let features = segment_features(&system, &segments, &keys);

        assert_eq!(features.len(), 4);
        assert_eq!(features[0].color, "red");
        assert_eq!(features[0].coordinates, [[0.0, 0.0], [0.0, 1.0]]);
        assert_eq!(features[0].offset, [-4.0, 0.0]);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let system = system();
        let segments = build_interline_segments(&system, &system.line_order());
        let features = segment_features(&system, &segments, &[SegmentKey::new("8", "9")]);
        assert!(features.is_empty());
    }

    #[test]
    fn test_group_by_offset() {
        let system = system();
        let segments = build_interline_segments(&system, &system.line_order());
        let keys: Vec<SegmentKey> = segments.keys().cloned().collect();
        let groups = group_by_offset(segment_features(&system, &segments, &keys));

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["-4|0", "4|0"]);
        assert!(groups["-4|0"].iter().all(|f| f.color == "red"));
        assert_eq!(groups["4|0"].len(), 2);
    }
}
