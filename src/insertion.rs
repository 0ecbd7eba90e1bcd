//! Where to insert a newly clicked station into an existing line.

use indexmap::IndexMap;

use crate::geometry::{distance_miles, Coordinate};
use crate::models::{Line, Station, StationId};

/// Index into `line.station_ids` at which `candidate` should be inserted.
///
/// The nearest existing station is found first (ties keep the earlier
/// index). For a circular line whose nearest match is the shared endpoint the
/// station goes to the start, or to the end if the closing entry matched. At
/// an open endpoint the candidate extends the line when it lies farther from
/// the neighbor than the endpoint does. In the interior the candidate goes on
/// the side of the closer neighbor unless that neighbor is closer to the
/// nearest station than to the candidate. Exact ties fall to the later
/// position.
///
/// Entries without coordinates are never chosen as nearest; a missing
/// neighbor places the candidate right after the nearest station.
#[must_use]
pub fn resolve_insertion_index(line: &Line, stations: &IndexMap<StationId, Station>, candidate: &Station) -> usize {
    let ids = &line.station_ids;
    if ids.len() <= 1 {
        return 0;
    }

    let target = candidate.coordinate();
    let coordinate = |index: usize| stations.get(&ids[index]).map(Station::coordinate);

    let Some((nearest, nearest_coord)) = nearest_station(ids.len(), target, coordinate) else {
        return ids.len();
    };

    let last = ids.len() - 1;

    if line.is_circular() && (nearest == 0 || nearest == last) {
        return if nearest == 0 { 0 } else { ids.len() };
    }

    if nearest == 0 {
        let Some(neighbor) = coordinate(1) else {
            return 1;
        };
        return if distance_miles(target, neighbor) > distance_miles(nearest_coord, neighbor) {
            0
        } else {
            1
        };
    }

    if nearest == last {
        let Some(neighbor) = coordinate(last - 1) else {
            return ids.len();
        };
        return if distance_miles(target, neighbor) > distance_miles(nearest_coord, neighbor) {
            ids.len()
        } else {
            last
        };
    }

    let (Some(prev), Some(next)) = (coordinate(nearest - 1), coordinate(nearest + 1)) else {
        return nearest + 1;
    };

    let prev_dist = distance_miles(target, prev);
    let next_dist = distance_miles(target, next);

    if prev_dist < next_dist {
        if distance_miles(nearest_coord, prev) < prev_dist {
            nearest + 1
        } else {
            nearest
        }
    } else if distance_miles(nearest_coord, next) < next_dist {
        nearest
    } else {
        nearest + 1
    }
}

/// First index with the strictly smallest distance to `target`
fn nearest_station(
    len: usize,
    target: Coordinate,
    coordinate: impl Fn(usize) -> Option<Coordinate>,
) -> Option<(usize, Coordinate)> {
    let mut best: Option<(usize, Coordinate, f64)> = None;

    for index in 0..len {
        let Some(point) = coordinate(index) else {
            continue;
        };
        let distance = distance_miles(target, point);
        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((index, point, distance));
        }
    }

    best.map(|(index, point, _)| (index, point))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stations along the equator, `lng` in degrees
    fn setup(points: &[(&str, f64)]) -> IndexMap<StationId, Station> {
        points
            .iter()
            .map(|(id, lng)| ((*id).to_string(), Station::new(*id, 0.0, *lng, *id)))
            .collect()
    }

    fn line(ids: &[&str]) -> Line {
        Line::new("0", "Red", "#e6194b").with_stations(ids.iter().copied())
    }

    fn at(lng: f64) -> Station {
        Station::new("new", 0.0, lng, "New")
    }

    #[test]
    fn test_empty_and_single_station_lines() {
        let stations = setup(&[("a", 0.0)]);
        assert_eq!(resolve_insertion_index(&line(&[]), &stations, &at(5.0)), 0);
        assert_eq!(resolve_insertion_index(&line(&["a"]), &stations, &at(5.0)), 0);
    }

    #[test]
    fn test_between_interior_and_end() {
        let stations = setup(&[("a", 0.0), ("b", 10.0), ("c", 20.0)]);
        assert_eq!(resolve_insertion_index(&line(&["a", "b", "c"]), &stations, &at(15.0)), 2);
        assert_eq!(resolve_insertion_index(&line(&["a", "b", "c"]), &stations, &at(6.0)), 1);
    }

    #[test]
    fn test_beyond_endpoints_extends_line() {
        let stations = setup(&[("a", 0.0), ("b", 10.0), ("c", 20.0)]);
        assert_eq!(resolve_insertion_index(&line(&["a", "b", "c"]), &stations, &at(-3.0)), 0);
        assert_eq!(resolve_insertion_index(&line(&["a", "b", "c"]), &stations, &at(25.0)), 3);
    }

    #[test]
    fn test_just_inside_endpoints() {
        let stations = setup(&[("a", 0.0), ("b", 10.0), ("c", 20.0)]);
        assert_eq!(resolve_insertion_index(&line(&["a", "b", "c"]), &stations, &at(2.0)), 1);
        assert_eq!(resolve_insertion_index(&line(&["a", "b", "c"]), &stations, &at(18.0)), 2);
    }

    #[test]
    fn test_interior_nearest_picks_closer_side() {
        let stations = setup(&[("a", 0.0), ("b", 10.0), ("c", 20.0), ("d", 30.0)]);
        let route = line(&["a", "b", "c", "d"]);
        assert_eq!(resolve_insertion_index(&route, &stations, &at(12.0)), 2);
        assert_eq!(resolve_insertion_index(&route, &stations, &at(8.0)), 1);
    }

    #[test]
    fn test_loop_near_shared_endpoint_inserts_at_start() {
        let mut stations = setup(&[("a", 0.0), ("b", 10.0), ("c", 20.0)]);
        stations.insert("b".to_string(), Station::new("b", 10.0, 10.0, "b"));
        let route = line(&["a", "b", "c", "a"]);
        assert!(route.is_circular());
        assert_eq!(resolve_insertion_index(&route, &stations, &at(-1.0)), 0);
    }

    #[test]
    fn test_missing_coordinates() {
        let stations = setup(&[("a", 0.0), ("c", 20.0)]);
        // Nearest is "a" and its neighbor is unknown
        assert_eq!(resolve_insertion_index(&line(&["a", "ghost", "c"]), &stations, &at(1.0)), 1);
        // Nothing on the line can be located
        assert_eq!(resolve_insertion_index(&line(&["x", "y"]), &stations, &at(1.0)), 2);
    }
}
