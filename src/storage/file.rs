use super::document::{MapDocument, RawMapDocument};
use super::CURRENT_DOCUMENT_VERSION;
use crate::error::{MapError, Result};

/// Serialize a document to bytes with version header
///
/// # Errors
/// Returns an error if `MessagePack` serialization fails
pub fn serialize_snapshot_to_bytes(document: &MapDocument) -> Result<Vec<u8>> {
    // Named fields: stations omit empty optional fields, which positional encoding cannot express
    let document_bytes = rmp_serde::to_vec_named(document)
        .map_err(|e| MapError::Serialization(format!("Failed to serialize snapshot: {e}")))?;

    // Create versioned format: [4 bytes u32 version][`MessagePack` data]
    let mut bytes = Vec::with_capacity(4 + document_bytes.len());
    bytes.extend_from_slice(&CURRENT_DOCUMENT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&document_bytes);

    Ok(bytes)
}

/// Deserialize a document from bytes with version header validation
///
/// # Errors
/// Returns an error if the data is truncated, the version is unsupported, or
/// deserialization fails
pub fn deserialize_snapshot_from_bytes(bytes: &[u8]) -> Result<MapDocument> {
    if bytes.len() < 4 {
        return Err(MapError::Serialization("Invalid snapshot: too small".to_string()));
    }

    let version_bytes: [u8; 4] = bytes[0..4]
        .try_into()
        .map_err(|_| MapError::Serialization("Invalid version header".to_string()))?;
    let version = u32::from_le_bytes(version_bytes);
    if version != CURRENT_DOCUMENT_VERSION {
        return Err(MapError::UnsupportedVersion(version));
    }

    let raw: RawMapDocument = rmp_serde::from_slice(&bytes[4..])
        .map_err(|e| MapError::Serialization(format!("Failed to parse snapshot: {e}")))?;

    // Same normalization and repair as stored JSON documents
    MapDocument::from_raw(raw)
}

/// Create a download filename for a map
#[must_use]
pub fn create_export_filename(title: &str) -> String {
    let now = chrono::Utc::now();
    format!(
        "{}.{}.transitmap",
        title.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_"),
        now.format("%Y-%m-%d-%H%M%S")
    )
}
