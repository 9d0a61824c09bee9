//! Archive names derived from display names.
//!
//! The mapping is deterministic and defined for every input, but it is not
//! injective: `"Ann B."` and `"ann b!"` share the name `ann_b_`, and names
//! that agree on their first 50 characters collide after truncation. The
//! store does not resolve collisions; the later save wins.

/// Maximum length of an archive name, in characters.
pub const MAX_ARCHIVE_NAME_LEN: usize = 50;

/// File extension of archive records.
pub const RECORD_EXTENSION: &str = "json";

/// Maps a display name to a filesystem-safe archive name.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, the result is
/// lowercased and cut to [`MAX_ARCHIVE_NAME_LEN`] characters.
///
/// ```
/// use whatsarchive::archive::archive_name;
///
/// assert_eq!(archive_name("Khalid Elm!"), "khalid_elm_");
/// assert_eq!(archive_name(""), "");
/// ```
pub fn archive_name(display_name: &str) -> String {
    display_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .take(MAX_ARCHIVE_NAME_LEN)
        .collect()
}

/// File name of the record stored under `archive_name`.
pub fn record_file_name(archive_name: &str) -> String {
    format!("{archive_name}.{RECORD_EXTENSION}")
}

/// Inverse of [`record_file_name`]; `None` for files that are not records.
pub fn archive_name_from_file(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(RECORD_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
}
