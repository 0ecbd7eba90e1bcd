use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LINES;
use super::StationId;

pub type LineId = String;

/// Transit mode of a line. Affects animation speed and dwell, not geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineMode {
    Bus,
    Tram,
    #[default]
    Rapid,
    Regional,
    Hsr,
}

impl LineMode {
    pub const ALL: [LineMode; 5] = [
        LineMode::Bus,
        LineMode::Tram,
        LineMode::Rapid,
        LineMode::Regional,
        LineMode::Hsr,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LineMode::Bus => "local bus",
            LineMode::Tram => "BRT/tram",
            LineMode::Rapid => "metro/rapid transit",
            LineMode::Regional => "regional rail",
            LineMode::Hsr => "high speed rail",
        }
    }

    /// Relative animation speed, 1.0 = 60 kph
    #[must_use]
    pub fn speed(self) -> f64 {
        match self {
            LineMode::Bus => 0.4,
            LineMode::Tram => 0.6,
            LineMode::Rapid => 1.0,
            LineMode::Regional => 2.0,
            LineMode::Hsr => 5.0,
        }
    }

    #[must_use]
    pub fn acceleration(self) -> f64 {
        match self {
            LineMode::Bus | LineMode::Tram | LineMode::Rapid => 2.0,
            LineMode::Regional | LineMode::Hsr => 1.0,
        }
    }

    /// Dwell time at each station in milliseconds
    #[must_use]
    pub fn pause_ms(self) -> u32 {
        match self {
            LineMode::Bus | LineMode::Tram | LineMode::Rapid => 500,
            LineMode::Regional => 1500,
            LineMode::Hsr => 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
    #[serde(default, rename = "stationIds")]
    pub station_ids: Vec<StationId>,
    #[serde(default)]
    pub mode: LineMode,
}

impl Line {
    #[must_use]
    pub fn new(id: impl Into<LineId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            station_ids: Vec::new(),
            mode: LineMode::default(),
        }
    }

    #[must_use]
    pub fn with_stations<I, S>(mut self, station_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StationId>,
    {
        self.station_ids = station_ids.into_iter().map(Into::into).collect();
        self
    }

    /// A line is circular when it has at least two entries and its first and
    /// last station ids are the same
    #[must_use]
    pub fn is_circular(&self) -> bool {
        self.station_ids.len() > 1 && self.station_ids.first() == self.station_ids.last()
    }

    #[must_use]
    pub fn contains_station(&self, station_id: &str) -> bool {
        self.station_ids.iter().any(|id| id == station_id)
    }

    /// Consecutive station pairs in travel order
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (&StationId, &StationId)> {
        self.station_ids.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

/// Pick name and color for a new line: the first palette entry whose color is
/// not used yet, cycling through the palette when all are taken
#[must_use]
pub fn next_default_line<'a, I>(used_colors: I, line_count: usize) -> (&'static str, &'static str)
where
    I: IntoIterator<Item = &'a str>,
{
    let used: Vec<&str> = used_colors.into_iter().collect();
    DEFAULT_LINES
        .iter()
        .find(|(_, color)| !used.contains(color))
        .copied()
        .unwrap_or(DEFAULT_LINES[line_count % DEFAULT_LINES.len()])
}
