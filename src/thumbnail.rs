//! Static-map thumbnail planning.
//!
//! A thumbnail is drawn by an external static-map service from one path per
//! line. Large systems overflow the service's request limits, so each attempt
//! is planned from a smaller subset of stations: first waypoints are dropped,
//! then the inclusion radius around the centroid is halved until the request
//! fits.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::{RemoteError, RemoteErrorKind};
use crate::geometry::{distance_miles, round_coordinate, Coordinate};
use crate::models::{EngineSettings, StationId, System};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailAttempt {
    #[serde(rename = "includeWaypoints")]
    pub include_waypoints: bool,
    /// Stations at least this far from the centroid (miles) are left out
    #[serde(rename = "distanceThreshold")]
    pub distance_threshold: f64,
}

impl ThumbnailAttempt {
    /// First attempt: every station within `max_dist` times the configured factor
    #[must_use]
    pub fn initial(max_dist: Option<f64>, settings: &EngineSettings) -> Self {
        Self {
            include_waypoints: true,
            distance_threshold: max_dist.unwrap_or(0.0) * settings.thumbnail_threshold_factor,
        }
    }

    /// Smaller attempt to make after `error`, or `None` when the failure is
    /// not about request size
    #[must_use]
    pub fn after_failure(&self, error: &RemoteError) -> Option<Self> {
        if error.kind != RemoteErrorKind::PayloadTooLarge {
            return None;
        }
        Some(if self.include_waypoints {
            Self {
                include_waypoints: false,
                ..*self
            }
        } else {
            Self {
                distance_threshold: self.distance_threshold / 2.0,
                ..*self
            }
        })
    }
}

/// One line drawn on a thumbnail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePath {
    /// `[lng, lat]` pairs
    pub coordinates: Vec<[f64; 2]>,
    #[serde(rename = "strokeWidth")]
    pub stroke_width: u32,
    #[serde(rename = "strokeColor")]
    pub stroke_color: String,
}

/// Paths for every line, limited to the stations the attempt includes.
///
/// Without a centroid nothing is included. Lines left with fewer than two
/// points are omitted.
#[must_use]
pub fn line_paths(
    system: &System,
    attempt: &ThumbnailAttempt,
    centroid: Option<Coordinate>,
    stroke_width: u32,
) -> Vec<LinePath> {
    let Some(centroid) = centroid else {
        return Vec::new();
    };

    let included = |id: &StationId| {
        system.stations.get(id).filter(|station| {
            (attempt.include_waypoints || !station.is_waypoint)
                && distance_miles(centroid, station.coordinate()) < attempt.distance_threshold
        })
    };

    system
        .lines
        .values()
        .filter_map(|line| {
            let coordinates: Vec<[f64; 2]> = line
                .station_ids
                .iter()
                .filter_map(included)
                .map(|station| [round_coordinate(station.lng), round_coordinate(station.lat)])
                .collect();

            (coordinates.len() > 1).then(|| LinePath {
                coordinates,
                stroke_width,
                stroke_color: line.color.clone(),
            })
        })
        .collect()
}

/// Drive `render` with ever smaller attempts until the request fits.
///
/// # Errors
/// Returns the renderer's error when it is not a size failure, or when a
/// size failure happens with nothing left to drop.
pub async fn render_thumbnail<T, F, Fut>(
    system: &System,
    centroid: Option<Coordinate>,
    max_dist: Option<f64>,
    settings: &EngineSettings,
    mut render: F,
) -> Result<T, RemoteError>
where
    F: FnMut(Vec<LinePath>) -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let mut attempt = ThumbnailAttempt::initial(max_dist, settings);

    loop {
        let paths = line_paths(system, &attempt, centroid, settings.thumbnail_stroke_width);
        let was_empty = paths.is_empty();

        match render(paths).await {
            Ok(image) => return Ok(image),
            Err(error) => {
                let next = if was_empty { None } else { attempt.after_failure(&error) };
                let Some(next) = next else {
                    return Err(error);
                };
                tracing::warn!(
                    include_waypoints = next.include_waypoints,
                    distance_threshold = next.distance_threshold,
                    "thumbnail request too large, retrying smaller"
                );
                attempt = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Line, Station};

    /// Stations 1 degree apart along the equator, "w" a waypoint
    fn system() -> System {
        let mut system = System::empty();
        system.stations.insert("a".to_string(), Station::new("a", 0.0, 0.0, "A"));
        system.stations.insert("w".to_string(), Station::waypoint("w", 0.0, 1.0));
        system.stations.insert("b".to_string(), Station::new("b", 0.0, 2.0, "B"));
        system.stations.insert("c".to_string(), Station::new("c", 0.0, 10.0, "C"));
        system.lines.insert(
            "0".to_string(),
            Line::new("0", "Red", "#e6194b").with_stations(["a", "w", "b", "c"]),
        );
        system.lines.insert(
            "1".to_string(),
            Line::new("1", "Green", "#3cb44b").with_stations(["c"]),
        );
        system
    }

    fn too_large() -> RemoteError {
        RemoteError::from_status(413, "payload too large")
    }

    #[test]
    fn test_initial_attempt() {
        let attempt = ThumbnailAttempt::initial(Some(10.0), &EngineSettings::default());
        assert!(attempt.include_waypoints);
        assert_eq!(attempt.distance_threshold, 15.0);
        assert_eq!(ThumbnailAttempt::initial(None, &EngineSettings::default()).distance_threshold, 0.0);
    }

    #[test]
    fn test_degrades_waypoints_then_threshold() {
        let first = ThumbnailAttempt::initial(Some(10.0), &EngineSettings::default());
        let second = first.after_failure(&too_large()).expect("retry");
        assert!(!second.include_waypoints);
        assert_eq!(second.distance_threshold, 15.0);
        let third = second.after_failure(&too_large()).expect("retry");
        assert_eq!(third.distance_threshold, 7.5);

        assert_eq!(first.after_failure(&RemoteError::from_status(500, "boom")), None);
    }

    #[test]
    fn test_line_paths_filter_and_round() {
        let system = system();
        let centroid = Some(Coordinate::new(0.0, 0.0));
        let attempt = ThumbnailAttempt {
            include_waypoints: true,
            distance_threshold: 200.0,
        };
        let paths = line_paths(&system, &attempt, centroid, 6);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].coordinates, vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        assert_eq!(paths[0].stroke_color, "#e6194b");
        assert_eq!(paths[0].stroke_width, 6);

        let without_waypoints = ThumbnailAttempt {
            include_waypoints: false,
            ..attempt
        };
        let paths = line_paths(&system, &without_waypoints, centroid, 6);
        assert_eq!(paths[0].coordinates, vec![[0.0, 0.0], [2.0, 0.0]]);

        assert!(line_paths(&system, &attempt, None, 6).is_empty());
    }

    #[tokio::test]
    async fn test_render_retries_until_it_fits() {
        let system = system();
        let settings = EngineSettings::default();
        let mut requests = Vec::new();

        let result = render_thumbnail(&system, Some(Coordinate::new(0.0, 0.0)), Some(700.0), &settings, |paths| {
            let points: usize = paths.iter().map(|p| p.coordinates.len()).sum();
            requests.push(points);
            async move {
                if points > 2 {
                    Err(too_large())
                } else {
                    Ok(points)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        // All four, then without the waypoint, then c falls outside the halved radius
        assert_eq!(requests, vec![4, 3, 2]);
    }

    #[tokio::test]
    async fn test_render_gives_up_on_other_errors() {
        let system = system();
        let result: Result<(), RemoteError> = render_thumbnail(
            &system,
            Some(Coordinate::new(0.0, 0.0)),
            Some(700.0),
            &EngineSettings::default(),
            |_| async { Err(RemoteError::from_status(403, "denied")) },
        )
        .await;
        assert_eq!(result.map_err(|e| e.kind), Err(RemoteErrorKind::PermissionDenied));
    }
}
