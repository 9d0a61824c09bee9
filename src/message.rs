//! Normalized message type.
//!
//! This module provides [`ParsedMessage`], the structured form of one
//! recognized export line, and [`MediaType`], its attachment category.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use whatsarchive::{MediaType, ParsedMessage};
//!
//! let ts = NaiveDate::from_ymd_opt(2024, 3, 30)
//!     .unwrap()
//!     .and_hms_opt(15, 23, 34)
//!     .unwrap();
//!
//! let msg = ParsedMessage::new(ts, "Ann", "Hello");
//! assert!(!msg.is_media());
//!
//! let photo = ParsedMessage::new(ts, "Ann", "")
//!     .with_media(MediaType::Image, Some("00000012-PHOTO.jpg".into()));
//! assert_eq!(photo.media_type(), Some(MediaType::Image));
//! ```
//!
//! ## Serialization
//!
//! Fields use camelCase names so archive records stay compatible with
//! `{ timestamp, sender, content, isMedia, mediaType }` documents:
//!
//! ```
//! # use chrono::NaiveDate;
//! # use whatsarchive::ParsedMessage;
//! # let ts = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap().and_hms_opt(15, 23, 34).unwrap();
//! let json = serde_json::to_string(&ParsedMessage::new(ts, "Ann", "Hello"))?;
//! assert!(json.contains(r#""isMedia":false"#));
//! assert!(!json.contains("mediaType"));
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Category of an attached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    /// Fallback for unknown extensions and ambiguous placeholders.
    Document,
}

impl MediaType {
    /// Classifies a file name by its extension (case-insensitive).
    ///
    /// ```
    /// use whatsarchive::MediaType;
    ///
    /// assert_eq!(MediaType::from_file_name("VOICE.OPUS"), MediaType::Audio);
    /// assert_eq!(MediaType::from_file_name("report.pdf"), MediaType::Document);
    /// assert_eq!(MediaType::from_file_name("no_extension"), MediaType::Document);
    /// ```
    pub fn from_file_name(file_name: &str) -> Self {
        let Some((_, extension)) = file_name.trim().rsplit_once('.') else {
            return MediaType::Document;
        };

        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" => MediaType::Image,
            "mp4" | "avi" | "mov" | "wmv" | "flv" | "webm" => MediaType::Video,
            "mp3" | "wav" | "ogg" | "opus" | "m4a" | "aac" => MediaType::Audio,
            _ => MediaType::Document,
        }
    }

    /// Returns the lowercase name used in archive records.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Document => "document",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recognized export line in normalized form.
///
/// | Field | Description |
/// |-------|-------------|
/// | `timestamp` | Naive local date-time; the export carries no timezone |
/// | `sender` | Trimmed display name, never empty |
/// | `content` | Trimmed body with any media marker removed; may be empty |
/// | `is_media` | Whether the line carried an attachment or media placeholder |
/// | `media_type` | Attachment category, present only when `is_media` |
/// | `media_file_name` | Attached file name, when the marker named one |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMessage {
    pub timestamp: NaiveDateTime,

    pub sender: String,

    pub content: String,

    #[serde(default)]
    pub is_media: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub media_type: Option<MediaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub media_file_name: Option<String>,
}

impl ParsedMessage {
    /// Creates a text message. No trimming happens here; the normalizer
    /// trims before construction.
    pub fn new(
        timestamp: NaiveDateTime,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            sender: sender.into(),
            content: content.into(),
            is_media: false,
            media_type: None,
            media_file_name: None,
        }
    }

    /// Builder method marking the message as media.
    #[must_use]
    pub fn with_media(mut self, media_type: MediaType, file_name: Option<String>) -> Self {
        self.is_media = true;
        self.media_type = Some(media_type);
        self.media_file_name = file_name;
        self
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_media(&self) -> bool {
        self.is_media
    }

    /// Returns the media category; `None` for text messages.
    pub fn media_type(&self) -> Option<MediaType> {
        if self.is_media { self.media_type } else { None }
    }

    pub fn media_file_name(&self) -> Option<&str> {
        self.media_file_name.as_deref()
    }
}
