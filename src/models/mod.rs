mod id;
mod line;
mod settings;
mod station;
mod system;
mod undo;

pub use id::{increment_id, Meta};
pub use line::{next_default_line, Line, LineId, LineMode};
pub use settings::{classify_spacing, default_levels, EngineSettings, SpacingLevel};
pub(crate) use station::RawStation;
pub use station::{Station, StationId};
pub use system::System;
pub use undo::UndoManager;
