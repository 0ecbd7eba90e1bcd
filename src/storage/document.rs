//! The JSON map document as kept by the document store.
//!
//! Stored documents come from several client generations: coordinates may
//! be strings, lines may reference deleted stations and the id counters may
//! lag behind the ids in use. Decoding repairs all of that.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::format_bytes;
use crate::constants::{DEFAULT_TITLE, MAX_DOCUMENT_BYTES};
use crate::error::{MapError, Result};
use crate::models::{Line, LineId, Meta, RawStation, Station, StationId, System};

/// A system together with its id counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDocument {
    #[serde(flatten)]
    pub system: System,
    pub meta: Meta,
}

/// Document as stored, before normalization and repair
#[derive(Debug, Deserialize)]
pub(super) struct RawMapDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    stations: IndexMap<StationId, RawStation>,
    #[serde(default)]
    lines: IndexMap<LineId, Line>,
    #[serde(default, rename = "editSeq")]
    edit_seq: u64,
    #[serde(default)]
    meta: Option<Meta>,
}

impl MapDocument {
    pub(super) fn from_raw(raw: RawMapDocument) -> Result<Self> {
        let mut stations = IndexMap::with_capacity(raw.stations.len());
        for (key, raw_station) in raw.stations {
            let mut station = Station::try_from(raw_station)?;
            if station.id != key {
                tracing::warn!(key = %key, id = %station.id, "station id does not match its key");
                station.id.clone_from(&key);
            }
            stations.insert(key, station);
        }

        let mut system = System {
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            stations,
            lines: raw.lines,
            edit_seq: raw.edit_seq,
        };
        system.repair_dangling_references();

        let meta = raw
            .meta
            .unwrap_or_default()
            .reconciled(system.stations.keys(), system.lines.keys());

        Ok(Self { system, meta })
    }
}

/// Decode a stored JSON document.
///
/// # Errors
/// `InvalidCoordinate` for a station whose position cannot be normalized,
/// `Serialization` for malformed JSON.
pub fn decode_document(json: &str) -> Result<MapDocument> {
    let raw: RawMapDocument =
        serde_json::from_str(json).map_err(|e| MapError::Serialization(format!("Failed to parse map document: {e}")))?;
    MapDocument::from_raw(raw)
}

/// Encode a document for the store.
///
/// Documents larger than a third of the store's size limit are written
/// without station info.
///
/// # Errors
/// Returns `Serialization` if JSON encoding fails.
pub fn encode_document(document: &MapDocument) -> Result<String> {
    let json = serde_json::to_string(document)
        .map_err(|e| MapError::Serialization(format!("Failed to serialize map document: {e}")))?;

    if json.len() <= MAX_DOCUMENT_BYTES / 3 {
        return Ok(json);
    }

    tracing::warn!(size = %format_bytes(json.len()), "map is large; trimming station info");
    let trimmed = MapDocument {
        system: System {
            stations: trim_station_info(&document.system.stations),
            ..document.system.clone()
        },
        meta: document.meta.clone(),
    };
    serde_json::to_string(&trimmed)
        .map_err(|e| MapError::Serialization(format!("Failed to serialize map document: {e}")))
}

/// Copy of `stations` without their free-form info
#[must_use]
pub fn trim_station_info(stations: &IndexMap<StationId, Station>) -> IndexMap<StationId, Station> {
    stations
        .iter()
        .map(|(id, station)| {
            let mut station = station.clone();
            station.info = None;
            (id.clone(), station)
        })
        .collect()
}
