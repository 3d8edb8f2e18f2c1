//! Key normalization shared by every path that touches a key.

/// Normalizes a caller-supplied key: trims surrounding whitespace, then lower-cases.
///
/// Keys that differ only by case or surrounding whitespace map to the same entry.
pub fn format_entry_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}
