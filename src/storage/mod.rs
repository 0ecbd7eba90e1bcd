mod document;
mod file;

pub use document::{decode_document, encode_document, trim_station_info, MapDocument};
pub use file::{create_export_filename, deserialize_snapshot_from_bytes, serialize_snapshot_to_bytes};

/// Current version of the binary snapshot format
pub const CURRENT_DOCUMENT_VERSION: u32 = 1;

const GB: f64 = 1_073_741_824.0;
const MB: f64 = 1_048_576.0;
const KB: f64 = 1_024.0;

/// Format bytes into a human-readable string with appropriate units
#[must_use]
pub fn format_bytes(bytes: usize) -> String {
    #[allow(clippy::cast_precision_loss)]
    let bytes_f = bytes as f64;

    if bytes_f >= GB {
        format!("{:.1} GB", bytes_f / GB)
    } else if bytes_f >= MB {
        format!("{:.1} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(1_572_864), "1.5 MB");
    }
}
