//! Conversion of captured line fields into [`ParsedMessage`] values.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::{ArchiveError, Result};
use crate::message::{MediaType, ParsedMessage};

use super::line::RawFields;

/// `<attached: 00000033-AUDIO-2024-03-31-00-39-42.opus>`
static ATTACHED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<attached:\s*([^>]*?)\s*>").expect("attached marker pattern is valid")
});

/// Placeholders written by "export without media", matched against the
/// whole message body.
const OMITTED_PLACEHOLDERS: &[(&str, MediaType)] = &[
    ("<Media omitted>", MediaType::Document),
    ("image omitted", MediaType::Image),
    ("video omitted", MediaType::Video),
    ("audio omitted", MediaType::Audio),
    ("sticker omitted", MediaType::Image),
    ("GIF omitted", MediaType::Video),
    ("document omitted", MediaType::Document),
];

const LEFT_TO_RIGHT_MARK: char = '\u{200e}';

/// Builds the absolute timestamp from `M/D/Y` and `H:MM[:SS]` text.
///
/// Two-digit years get a `20` prefix. Missing seconds become `:00`.
///
/// ```
/// use whatsarchive::parsing::parse_timestamp;
///
/// let ts = parse_timestamp("3/30/24", "15:23").unwrap();
/// assert_eq!(ts.to_string(), "2024-03-30 15:23:00");
///
/// assert!(parse_timestamp("2/30/24", "10:00").is_err());
/// ```
pub fn parse_timestamp(date_text: &str, time_text: &str) -> Result<NaiveDateTime> {
    let invalid = || ArchiveError::invalid_timestamp(format!("{date_text}, {time_text}"));

    let mut date_parts = date_text.split('/');
    let (Some(month), Some(day), Some(year), None) = (
        date_parts.next(),
        date_parts.next(),
        date_parts.next(),
        date_parts.next(),
    ) else {
        return Err(invalid());
    };

    let year: i32 = match year.len() {
        2 => format!("20{year}").parse().map_err(|_| invalid())?,
        4 => year.parse().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;

    let mut time_parts = time_text.split(':');
    let (Some(hour), Some(minute), second, None) = (
        time_parts.next(),
        time_parts.next(),
        time_parts.next().unwrap_or("00"),
        time_parts.next(),
    ) else {
        return Err(invalid());
    };
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    let second: u32 = second.parse().map_err(|_| invalid())?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)?;
    Ok(date.and_time(time))
}

/// Message body after media detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaContent {
    /// Body with the media marker removed
    pub content: String,
    /// Category and attached file name, when the body carried media
    pub media: Option<(MediaType, Option<String>)>,
}

/// Detects an attached-file marker or a media placeholder in `content`.
///
/// The marker and the direction marks around it are removed; whatever
/// remains is the caption.
///
/// ```
/// use whatsarchive::MediaType;
/// use whatsarchive::parsing::classify_media;
///
/// let media = classify_media("\u{200e}<attached: 00000012-PHOTO.jpg> sunset");
/// assert_eq!(media.content, "sunset");
/// assert_eq!(media.media, Some((MediaType::Image, Some("00000012-PHOTO.jpg".to_string()))));
/// ```
pub fn classify_media(content: &str) -> MediaContent {
    if let Some(caps) = ATTACHED_MARKER.captures(content) {
        let file_name = caps.get(1).map_or("", |m| m.as_str());
        let media_type = MediaType::from_file_name(file_name);

        let marker = caps.get(0).map_or(0..0, |m| m.range());
        let before = trim_marks(&content[..marker.start]);
        let after = trim_marks(&content[marker.end..]);
        let caption = match (before.is_empty(), after.is_empty()) {
            (true, _) => after.to_string(),
            (false, true) => before.to_string(),
            (false, false) => format!("{before} {after}"),
        };

        let file_name = (!file_name.is_empty()).then(|| file_name.to_string());
        return MediaContent {
            content: caption,
            media: Some((media_type, file_name)),
        };
    }

    let bare = trim_marks(content);
    for (placeholder, media_type) in OMITTED_PLACEHOLDERS {
        if bare.eq_ignore_ascii_case(placeholder) {
            return MediaContent {
                content: String::new(),
                media: Some((*media_type, None)),
            };
        }
    }

    MediaContent {
        content: content.to_string(),
        media: None,
    }
}

fn trim_marks(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == LEFT_TO_RIGHT_MARK)
}

/// Produces a [`ParsedMessage`] from captured fields.
///
/// Fails only when the date/time does not form a valid timestamp.
pub fn normalize(fields: RawFields<'_>) -> Result<ParsedMessage> {
    let timestamp = parse_timestamp(fields.date, fields.time)?;
    let MediaContent { content, media } = classify_media(fields.content.trim());

    let message = ParsedMessage::new(timestamp, fields.sender.trim(), content);
    Ok(match media {
        Some((media_type, file_name)) => message.with_media(media_type, file_name),
        None => message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::classify_line;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_timestamp_two_digit_year() {
        assert_eq!(
            parse_timestamp("3/30/24", "15:23:34").unwrap(),
            dt(2024, 3, 30, 15, 23, 34)
        );
    }

    #[test]
    fn test_parse_timestamp_four_digit_year() {
        assert_eq!(
            parse_timestamp("12/01/2023", "09:05:00").unwrap(),
            dt(2023, 12, 1, 9, 5, 0)
        );
    }

    #[test]
    fn test_parse_timestamp_without_seconds() {
        assert_eq!(
            parse_timestamp("1/5/24", "7:45").unwrap(),
            dt(2024, 1, 5, 7, 45, 0)
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_impossible_values() {
        for (date, time) in [
            ("13/1/24", "10:00"),
            ("2/30/24", "10:00"),
            ("0/10/24", "10:00"),
            ("1/1/24", "24:00"),
            ("1/1/24", "10:60"),
            ("1/1/24", "10:59:60"),
            ("1/1/024", "10:00"),
            ("1/1", "10:00"),
            ("1/1/24", "10"),
        ] {
            let err = parse_timestamp(date, time).unwrap_err();
            assert!(err.is_invalid_timestamp(), "{date} {time}");
        }
    }

    #[test]
    fn test_parse_timestamp_leap_day() {
        assert!(parse_timestamp("2/29/24", "10:00").is_ok());
        assert!(parse_timestamp("2/29/23", "10:00").is_err());
    }

    #[test]
    fn test_classify_media_attached_audio() {
        let media = classify_media("\u{200e}<attached: 00000033-AUDIO-2024-03-31-00-39-42.opus>");
        assert_eq!(media.content, "");
        assert_eq!(
            media.media,
            Some((
                MediaType::Audio,
                Some("00000033-AUDIO-2024-03-31-00-39-42.opus".to_string())
            ))
        );
    }

    #[test]
    fn test_classify_media_caption_before_marker() {
        let media = classify_media("look at this <attached: clip.MOV>");
        assert_eq!(media.content, "look at this");
        assert_eq!(media.media.unwrap().0, MediaType::Video);
    }

    #[test]
    fn test_classify_media_marker_mid_caption() {
        let media = classify_media("look <attached: a.jpg> here");
        assert_eq!(media.content, "look here");

        let media = classify_media("look \u{200e}<attached: a.jpg>\u{200e}   here");
        assert_eq!(media.content, "look here");
        assert_eq!(media.media, Some((MediaType::Image, Some("a.jpg".to_string()))));
    }

    #[test]
    fn test_classify_media_unknown_extension_is_document() {
        let media = classify_media("<attached: contract.pdf>");
        assert_eq!(media.media.unwrap().0, MediaType::Document);
    }

    #[test]
    fn test_classify_media_empty_marker() {
        let media = classify_media("<attached: >");
        assert_eq!(media.media, Some((MediaType::Document, None)));
    }

    #[test]
    fn test_classify_media_placeholders() {
        assert_eq!(
            classify_media("<Media omitted>").media,
            Some((MediaType::Document, None))
        );
        assert_eq!(
            classify_media("\u{200e}image omitted").media,
            Some((MediaType::Image, None))
        );
        assert_eq!(
            classify_media("GIF omitted").media,
            Some((MediaType::Video, None))
        );
        assert_eq!(classify_media("image omitted").content, "");
    }

    #[test]
    fn test_classify_media_placeholder_needs_whole_body() {
        let media = classify_media("my image omitted the best part");
        assert!(media.media.is_none());
        assert_eq!(media.content, "my image omitted the best part");
    }

    #[test]
    fn test_classify_media_plain_text_untouched() {
        let media = classify_media("\u{200e}hello");
        assert!(media.media.is_none());
        assert_eq!(media.content, "\u{200e}hello");
    }

    #[test]
    fn test_normalize_text_line() {
        let fields = classify_line("[3/30/24, 15:23:34] Ann: Hello").unwrap();
        let msg = normalize(fields).unwrap();
        assert_eq!(msg.sender, "Ann");
        assert_eq!(msg.content, "Hello");
        assert!(!msg.is_media);
        assert_eq!(msg.timestamp, dt(2024, 3, 30, 15, 23, 34));
    }

    #[test]
    fn test_normalize_media_line() {
        let fields = classify_line(
            "[6/24/24, 22:38:58] Mourad: <attached: 00000104-VIDEO-2024-06-24-22-38-58.mp4>",
        )
        .unwrap();
        let msg = normalize(fields).unwrap();
        assert!(msg.is_media);
        assert_eq!(msg.media_type, Some(MediaType::Video));
        assert_eq!(msg.content, "");
    }

    #[test]
    fn test_normalize_invalid_timestamp() {
        let fields = classify_line("[13/45/24, 15:23:34] Ann: Hello").unwrap();
        assert!(normalize(fields).unwrap_err().is_invalid_timestamp());
    }
}
