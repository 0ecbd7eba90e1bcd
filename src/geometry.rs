use serde::{Deserialize, Serialize};

use crate::constants::{COORDINATE_DECIMALS, MILES_PER_DEGREE};
use crate::error::{MapError, Result};

/// A WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `[lng, lat]` ordering used by map renderers
    #[must_use]
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// A coordinate component as it may arrive from stored documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl From<f64> for RawCoordinate {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawCoordinate {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Rounds a value to the fixed coordinate precision
#[must_use]
pub fn round_coordinate(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_DECIMALS);
    (value * scale).round() / scale
}

/// Parses and rounds one coordinate component.
///
/// `field` names the component (`"lat"` or `"lng"`) for the error report.
///
/// # Errors
/// Returns `MapError::InvalidCoordinate` for unparseable text, non-finite
/// values and latitudes outside [-90, 90].
pub fn normalize_coordinate(field: &'static str, raw: &RawCoordinate) -> Result<f64> {
    let invalid = || MapError::InvalidCoordinate {
        field,
        value: match raw {
            RawCoordinate::Number(n) => n.to_string(),
            RawCoordinate::Text(s) => s.clone(),
        },
    };

    let value = match raw {
        RawCoordinate::Number(n) => *n,
        RawCoordinate::Text(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
    };

    if !value.is_finite() {
        return Err(invalid());
    }
    if field == "lat" && !(-90.0..=90.0).contains(&value) {
        return Err(invalid());
    }

    Ok(round_coordinate(value))
}

/// Great-circle distance in statute miles (spherical law of cosines)
#[must_use]
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    if a.lat == b.lat && a.lng == b.lng {
        return 0.0;
    }

    let rad_lat1 = a.lat.to_radians();
    let rad_lat2 = b.lat.to_radians();
    let rad_theta = (a.lng - b.lng).to_radians();

    let cos_arc = rad_lat1.sin() * rad_lat2.sin() + rad_lat1.cos() * rad_lat2.cos() * rad_theta.cos();

    // Rounding can push the cosine just past 1 for nearby points
    cos_arc.clamp(-1.0, 1.0).acos().to_degrees() * MILES_PER_DEGREE
}

/// Sum of great-circle distances along a path
#[must_use]
pub fn path_length_miles(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|pair| distance_miles(pair[0], pair[1])).sum()
}

/// Unit vector perpendicular to the segment `from -> to` in screen space.
///
/// Screen space has x pointing east and y pointing south, so latitude is
/// negated. The normal points to the right of the direction of travel as
/// seen on screen. Returns `None` when both ends coincide.
#[must_use]
pub fn screen_normal(from: Coordinate, to: Coordinate) -> Option<(f64, f64)> {
    let dx = to.lng - from.lng;
    let dy = -(to.lat - from.lat);
    let length = dx.hypot(dy);

    if length < 1e-12 {
        return None;
    }

    Some((-dy / length, dx / length))
}

/// Rounds `value` to the nearest multiple of `grid`
#[must_use]
pub fn round_to_grid(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    let rounded = (value / grid).round() * grid;
    // Avoid emitting negative zero
    if rounded == 0.0 { 0.0 } else { rounded }
}
