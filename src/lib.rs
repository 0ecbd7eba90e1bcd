#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod logging;

pub mod constants;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod insertion;
pub mod interline;
pub mod models;
pub mod places;
pub mod sections;
pub mod session;
pub mod storage;
pub mod thumbnail;
pub mod track_stats;

#[doc(hidden)]
pub use tracing as __tracing;

#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
pub use web_sys as __web_sys;

pub use edit::{apply_edit, ChangeSet, EditOp, EditOutcome};
pub use error::{MapError, Result};
pub use insertion::resolve_insertion_index;
pub use interline::{build_interline_segments, diff_interline_segments, SegmentKey, SegmentMap};
pub use sections::partition_sections;
pub use session::EditSession;
pub use track_stats::{compute_track_statistics, summarize_system};
