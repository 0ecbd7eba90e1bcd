//! Error types for the transit map engine.
//!
//! The geometry and interline algorithms never fail; errors only come from
//! coordinate normalization, edits naming unknown entities, settings and
//! document decoding.

use thiserror::Error;

/// Errors raised by the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("invalid coordinate for {field}: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("unknown station: {0}")]
    UnknownStation(String),

    #[error("unknown line: {0}")]
    UnknownLine(String),

    #[error("station {station_id} is already on line {line_id}")]
    DuplicateStation { line_id: String, station_id: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("unsupported document version: {0}")]
    UnsupportedVersion(u32),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, MapError>;

/// Whether a failed call to an external collaborator is worth repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Retryable,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    NotFound,
    PermissionDenied,
    InvalidArgument,
    /// The request body or URL was too large (HTTP 413/414)
    PayloadTooLarge,
    Unavailable,
    Timeout,
    Other,
}

/// Failure reported by a network collaborator (geocoder, document store, static map service)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind:?}: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    #[must_use]
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Map an HTTP status code onto an error kind
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            400 | 422 => RemoteErrorKind::InvalidArgument,
            401 | 403 => RemoteErrorKind::PermissionDenied,
            404 | 410 => RemoteErrorKind::NotFound,
            408 | 504 => RemoteErrorKind::Timeout,
            413 | 414 => RemoteErrorKind::PayloadTooLarge,
            429 | 500 | 502 | 503 => RemoteErrorKind::Unavailable,
            _ => RemoteErrorKind::Other,
        };
        Self::new(kind, message)
    }

    #[must_use]
    pub fn class(&self) -> FailureClass {
        match self.kind {
            RemoteErrorKind::Unavailable | RemoteErrorKind::Timeout => FailureClass::Retryable,
            RemoteErrorKind::NotFound
            | RemoteErrorKind::PermissionDenied
            | RemoteErrorKind::InvalidArgument
            | RemoteErrorKind::PayloadTooLarge
            | RemoteErrorKind::Other => FailureClass::Terminal,
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.class() == FailureClass::Retryable
    }
}
