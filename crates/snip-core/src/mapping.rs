use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Format of the creation timestamp stored alongside each mapping.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp the way mappings store it (`YYYY-MM-DD HH:MM:SS`,
/// UTC).
///
/// The store and the wire both carry the formatted string, so every
/// producer must go through this helper to stay comparable.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp
        .to_zoned(TimeZone::UTC)
        .strftime(TIMESTAMP_FORMAT)
        .to_string()
}

/// A stored URL mapping, keyed externally by its short code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlMapping {
    /// The original URL that was shortened.
    pub original_url: String,
    /// When the mapping was created or last regenerated.
    pub created_at: String,
}
