use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::geometry::{normalize_coordinate, Coordinate, RawCoordinate};

pub type StationId = String;

/// A stop or waypoint on the map.
///
/// Waypoints only shape line geometry; they carry no name or info and do not
/// bound sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStation")]
pub struct Station {
    pub id: StationId,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, rename = "isWaypoint", skip_serializing_if = "std::ops::Not::not")]
    pub is_waypoint: bool,
}

/// Station as stored, before coordinate normalization
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawStation {
    id: StationId,
    lat: RawCoordinate,
    lng: RawCoordinate,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    info: Option<String>,
    #[serde(default, rename = "isWaypoint")]
    is_waypoint: bool,
}

impl TryFrom<RawStation> for Station {
    type Error = MapError;

    fn try_from(raw: RawStation) -> Result<Self, Self::Error> {
        Ok(Self {
            lat: normalize_coordinate("lat", &raw.lat)?,
            lng: normalize_coordinate("lng", &raw.lng)?,
            id: raw.id,
            // Waypoints never carry rider-facing data
            name: if raw.is_waypoint { None } else { raw.name },
            info: if raw.is_waypoint { None } else { raw.info },
            is_waypoint: raw.is_waypoint,
        })
    }
}

impl Station {
    /// Create a named station at an already normalized position
    #[must_use]
    pub fn new(id: impl Into<StationId>, lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            name: Some(name.into()),
            info: None,
            is_waypoint: false,
        }
    }

    #[must_use]
    pub fn waypoint(id: impl Into<StationId>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            name: None,
            info: None,
            is_waypoint: true,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}
