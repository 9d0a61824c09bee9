//! Byte decoding and mojibake repair for export text.
//!
//! Exports that passed through a Windows tool are sometimes UTF-8 read as
//! Windows-1252, so each UTF-8 byte became its own character.
//! Example: "😅" becomes "ðŸ˜…"
//!
//! [`repair_mojibake`] reverses that by re-encoding the line as
//! Windows-1252 and decoding the bytes as UTF-8. Lines that do not survive
//! the round trip are returned untouched, so genuine Latin-1 text such as
//! "café" is safe.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;

const BOM: &str = "\u{feff}";

/// Decodes raw export bytes, replacing invalid UTF-8 sequences with U+FFFD
/// and dropping a leading byte-order mark.
///
/// ```
/// use whatsarchive::parsing::decode_export;
///
/// let text = decode_export(b"\xEF\xBB\xBF[1/1/24, 10:00] Ann: hi \xFF");
/// assert_eq!(text, "[1/1/24, 10:00] Ann: hi \u{FFFD}");
/// ```
pub fn decode_export(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

/// Repairs one line of Windows-1252 mojibake.
///
/// ```
/// use whatsarchive::parsing::repair_mojibake;
///
/// assert_eq!(repair_mojibake("ðŸ˜…"), "😅");
/// assert_eq!(repair_mojibake("café"), "café");
/// assert_eq!(repair_mojibake("plain ascii"), "plain ascii");
/// ```
pub fn repair_mojibake(line: &str) -> Cow<'_, str> {
    if line.is_ascii() {
        return Cow::Borrowed(line);
    }

    let (bytes, _, had_unmappable) = WINDOWS_1252.encode(line);
    if had_unmappable {
        return Cow::Borrowed(line);
    }

    match std::str::from_utf8(&bytes) {
        Ok(repaired) if repaired != line => Cow::Owned(repaired.to_string()),
        _ => Cow::Borrowed(line),
    }
}
