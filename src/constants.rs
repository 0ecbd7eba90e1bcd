/// Number of decimal places coordinates are rounded to on normalization
pub const COORDINATE_DECIMALS: i32 = 5;

/// Statute miles per degree of great-circle arc (60 nautical miles x 1.1515)
pub const MILES_PER_DEGREE: f64 = 60.0 * 1.1515;

/// Default rendered line width in screen pixels
pub const DEFAULT_LINE_WIDTH: f64 = 8.0;

/// Offsets snap to this grid (screen pixels)
pub const DEFAULT_OFFSET_GRID: f64 = 0.5;

/// Maximum number of undo snapshots kept
pub const MAX_HISTORY_SIZE: usize = 25;

/// Title given to a fresh system
pub const DEFAULT_TITLE: &str = "MetroDreamin'";

/// Name given to a new station until a place lookup provides one
pub const DEFAULT_STATION_NAME: &str = "Station Name";

/// Suffix appended to the name of a duplicated line
pub const FORK_SUFFIX: &str = " - Fork";

/// Maximum encoded size of a map document in the document store
pub const MAX_DOCUMENT_BYTES: usize = 1_048_576;

/// Stroke width of line paths drawn on thumbnails
pub const DEFAULT_THUMBNAIL_STROKE_WIDTH: u32 = 6;

/// Initial thumbnail inclusion radius as a multiple of the system's max distance
pub const DEFAULT_THUMBNAIL_THRESHOLD_FACTOR: f64 = 1.5;

/// Palette used when adding lines, in preference order
pub const DEFAULT_LINES: [(&str, &str); 21] = [
    ("Red Line", "#e6194b"),
    ("Green Line", "#3cb44b"),
    ("Yellow Line", "#ffe119"),
    ("Blue Line", "#4363d8"),
    ("Orange Line", "#f58231"),
    ("Purple Line", "#911eb4"),
    ("Cyan Line", "#42d4f4"),
    ("Magenta Line", "#f032e6"),
    ("Lime Line", "#bfef45"),
    ("Pink Line", "#fabebe"),
    ("Teal Line", "#469990"),
    ("Lavender Line", "#e6beff"),
    ("Brown Line", "#9A6324"),
    ("Beige Line", "#fffac8"),
    ("Maroon Line", "#800000"),
    ("Mint Line", "#aaffc3"),
    ("Olive Line", "#808000"),
    ("Apricot Line", "#ffd8b1"),
    ("Navy Line", "#000075"),
    ("Grey Line", "#a9a9a9"),
    ("Black Line", "#191919"),
];
