//! Line classification for bracketed WhatsApp exports.
//!
//! Supported line shapes, tried in this order:
//! - `[3/30/24, 15:23:34] Sender: Message`
//! - `[3/30/24, 15:23] Sender: Message`
//!
//! The sender is everything between the closing bracket and the first colon,
//! and that colon must be followed by whitespace. A sender name that itself
//! contains a colon therefore splits in the wrong place; this is accepted.

use std::sync::LazyLock;

use regex::Regex;

/// Line patterns in priority order.
static LINE_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        // [3/30/24, 15:23:34] Khalid Elm: message
        Regex::new(
            r"^\[([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}),\s([0-9]{1,2}:[0-9]{2}:[0-9]{2})\]\s([^:]+?):\s(.*)$",
        )
        .expect("seconds pattern is valid"),
        // [3/30/24, 15:23] Khalid Elm: message
        Regex::new(
            r"^\[([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}),\s([0-9]{1,2}:[0-9]{2})\]\s([^:]+?):\s(.*)$",
        )
        .expect("minutes pattern is valid"),
    ]
});

/// Fields captured from a message-start line, borrowed from the line.
///
/// `sender` and `content` are already trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFields<'a> {
    pub date: &'a str,
    pub time: &'a str,
    pub sender: &'a str,
    pub content: &'a str,
}

/// Returns the captured fields when `line` starts a message, `None` otherwise.
///
/// Blank and whitespace-only lines return `None` without running a pattern.
/// A sender that trims to nothing is not a message start either.
///
/// # Example
///
/// ```
/// use whatsarchive::parsing::classify_line;
///
/// let fields = classify_line("[3/30/24, 15:23:34] Ann: Hello").unwrap();
/// assert_eq!(fields.sender, "Ann");
/// assert_eq!(fields.content, "Hello");
///
/// assert!(classify_line("continuation of a long message").is_none());
/// ```
pub fn classify_line(line: &str) -> Option<RawFields<'_>> {
    if line.trim().is_empty() {
        return None;
    }

    let caps = LINE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(line))?;

    let date = caps.get(1).map_or("", |m| m.as_str());
    let time = caps.get(2).map_or("", |m| m.as_str());
    let sender = caps.get(3).map_or("", |m| m.as_str().trim());
    let content = caps.get(4).map_or("", |m| m.as_str().trim());

    if sender.is_empty() {
        return None;
    }

    Some(RawFields {
        date,
        time,
        sender,
        content,
    })
}
