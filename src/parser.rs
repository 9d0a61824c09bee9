//! Whole-export parsing.
//!
//! [`ChatParser`] runs the line classifier and normalizer over every line of
//! an export and derives the participant set in the same pass.
//!
//! # Example
//!
//! ```rust
//! use whatsarchive::parser::ChatParser;
//!
//! let export = "\
//! [3/30/24, 15:23:34] Khalid Elm: Salam Mourad hanya wella ?
//! [3/30/24, 15:39:55] Mourad: Salam khalid
//! this line continues nothing and is dropped";
//!
//! let outcome = ChatParser::new().parse_str(export);
//! assert_eq!(outcome.messages.len(), 2);
//! assert_eq!(outcome.participants.chat_title, "Khalid Elm & Mourad");
//! assert_eq!(outcome.stats.unrecognized, 1);
//! ```
//!
//! # Line handling
//!
//! Every line ends up in exactly one bucket:
//! - parsed into a [`ParsedMessage`]
//! - blank (empty or whitespace-only)
//! - unrecognized (not a message-start line; continuation lines land here)
//! - malformed timestamp (right shape, impossible date or time)
//!
//! No bucket other than the first aborts or fails the parse.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::error::Result;
use crate::message::ParsedMessage;
use crate::parsing::{
    ChatParticipants, UNKNOWN_TITLE, classify_line, decode_export, normalize, repair_mojibake,
};

/// Why a line produced no message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Blank,
    Unrecognized,
    InvalidTimestamp,
}

/// Classification result for a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Matched(ParsedMessage),
    Skipped(SkipReason),
}

impl LineOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, LineOutcome::Matched(_))
    }

    pub fn into_message(self) -> Option<ParsedMessage> {
        match self {
            LineOutcome::Matched(message) => Some(message),
            LineOutcome::Skipped(_) => None,
        }
    }
}

/// Line counters for one parse.
///
/// `lines == messages + blank + unrecognized + invalid_timestamps` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub lines: usize,
    pub messages: usize,
    pub blank: usize,
    pub unrecognized: usize,
    pub invalid_timestamps: usize,
}

impl ParseStats {
    /// Lines that produced no message.
    pub fn skipped(&self) -> usize {
        self.blank + self.unrecognized + self.invalid_timestamps
    }

    fn record(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Matched(_) => self.messages += 1,
            LineOutcome::Skipped(SkipReason::Blank) => self.blank += 1,
            LineOutcome::Skipped(SkipReason::Unrecognized) => self.unrecognized += 1,
            LineOutcome::Skipped(SkipReason::InvalidTimestamp) => self.invalid_timestamps += 1,
        }
    }
}

/// Everything a parse produces.
///
/// `messages` keeps system-notice lines; `participants` does not count their
/// senders. The two views are deliberately independent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub messages: Vec<ParsedMessage>,
    pub participants: ChatParticipants,
    pub stats: ParseStats,
}

/// Parser for bracketed WhatsApp TXT exports.
///
/// Parsing is pure and synchronous; one parser can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ChatParser {
    config: ParserConfig,
}

impl ChatParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Classifies and normalizes one line.
    pub fn classify(&self, line: &str) -> LineOutcome {
        self.classify_numbered(line, None)
    }

    fn classify_numbered(&self, line: &str, line_number: Option<usize>) -> LineOutcome {
        let line = if self.config.fix_encoding {
            repair_mojibake(line)
        } else {
            line.into()
        };

        if line.trim().is_empty() {
            return LineOutcome::Skipped(SkipReason::Blank);
        }

        let Some(fields) = classify_line(&line) else {
            return LineOutcome::Skipped(SkipReason::Unrecognized);
        };

        match normalize(fields) {
            Ok(message) => LineOutcome::Matched(message),
            Err(err) => {
                match line_number {
                    Some(line) => tracing::debug!(line, error = %err, "malformed timestamp"),
                    None => tracing::debug!(error = %err, "malformed timestamp"),
                }
                LineOutcome::Skipped(SkipReason::InvalidTimestamp)
            }
        }
    }

    /// Parses a whole export held in memory.
    pub fn parse_str(&self, text: &str) -> ParseOutcome {
        let (messages, stats) = text.lines().enumerate().fold(
            (Vec::new(), ParseStats::default()),
            |(mut messages, mut stats), (index, line)| {
                // fully empty lines never reach the classifier
                let outcome = if line.is_empty() {
                    LineOutcome::Skipped(SkipReason::Blank)
                } else {
                    self.classify_numbered(line, Some(index + 1))
                };
                stats.record(&outcome);

                if let Some(message) = outcome.into_message() {
                    messages.push(message);
                }
                (messages, stats)
            },
        );

        let participants = ChatParticipants::from_messages(&messages, &self.config);

        tracing::debug!(
            messages = stats.messages,
            skipped = stats.skipped(),
            invalid_timestamps = stats.invalid_timestamps,
            participants = participants.len(),
            "parsed export"
        );

        ParseOutcome {
            messages,
            participants,
            stats,
        }
    }

    /// Derives only the participant set of an export.
    pub fn participants(&self, text: &str) -> ChatParticipants {
        let messages: Vec<ParsedMessage> = text
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| self.classify(line).into_message())
            .collect();
        ChatParticipants::from_messages(&messages, &self.config)
    }

    /// Reads and parses an export file.
    pub async fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParseOutcome> {
        let text = read_export(path).await?;
        Ok(self.parse_str(&text))
    }
}

/// Parses an export with the default configuration.
pub fn parse_chat_file(text: &str) -> ParseOutcome {
    ChatParser::new().parse_str(text)
}

/// Derives the participant set of an export with the default configuration.
pub fn extract_participants(text: &str) -> ChatParticipants {
    ChatParser::new().participants(text)
}

/// Reads an export file as text, tolerating invalid UTF-8.
pub async fn read_export(path: impl AsRef<Path>) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(decode_export(&bytes))
}

/// Contact name implied by an export's file name.
///
/// ```
/// use whatsarchive::parser::contact_name_from_file_name;
///
/// assert_eq!(contact_name_from_file_name("Khalid Elm_chat.txt"), "Khalid Elm");
/// assert_eq!(contact_name_from_file_name("notes.txt"), "notes");
/// assert_eq!(contact_name_from_file_name("_chat.txt"), "Unknown");
/// ```
pub fn contact_name_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix("_chat.txt")
        .or_else(|| file_name.strip_suffix(".txt"))
        .unwrap_or(file_name)
        .trim();

    if stem.is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        stem.to_string()
    }
}
