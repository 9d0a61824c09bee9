//! The persisted conversation record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::ParsedMessage;
use crate::parser::ParseOutcome;

use super::naming::archive_name;

/// One archived conversation.
///
/// `last_updated` and `message_count` are owned by the store: `save` stamps
/// both, and `message_count` is recomputed from `messages` on every load.
///
/// # JSON shape
///
/// ```json
/// {
///   "contactName": "Khalid Elm & Mourad",
///   "messages": [
///     {"timestamp": "2024-03-30T15:23:34", "sender": "Mourad", "content": "Salam", "isMedia": false}
///   ],
///   "participants": ["Khalid Elm", "Mourad"],
///   "lastUpdated": "2024-04-01T09:00:00Z",
///   "messageCount": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub contact_name: String,

    #[serde(default)]
    pub messages: Vec<ParsedMessage>,

    #[serde(default)]
    pub participants: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub message_count: usize,
}

impl Conversation {
    /// Creates an unsaved conversation.
    pub fn new(
        contact_name: impl Into<String>,
        messages: Vec<ParsedMessage>,
        participants: Vec<String>,
    ) -> Self {
        let message_count = messages.len();
        Self {
            contact_name: contact_name.into(),
            messages,
            participants,
            last_updated: None,
            message_count,
        }
    }

    /// Wraps a parse result under an explicit display name.
    pub fn from_parse(contact_name: impl Into<String>, outcome: ParseOutcome) -> Self {
        Self::new(
            contact_name,
            outcome.messages,
            outcome.participants.participants,
        )
    }

    /// Wraps a parse result, naming it after the derived chat title.
    pub fn from_parse_titled(outcome: ParseOutcome) -> Self {
        let title = outcome.participants.chat_title.clone();
        Self::from_parse(title, outcome)
    }

    /// Storage key derived from `contact_name`.
    pub fn archive_name(&self) -> String {
        archive_name(&self.contact_name)
    }

    /// Sort key for recency; records never saved count as the Unix epoch.
    pub fn last_updated_or_epoch(&self) -> DateTime<Utc> {
        self.last_updated.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn refresh_message_count(&mut self) {
        self.message_count = self.messages.len();
    }
}

/// Borrowed view written to disk, so saving never clones the messages.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordRef<'a> {
    pub contact_name: &'a str,
    pub messages: &'a [ParsedMessage],
    pub participants: &'a [String],
    pub last_updated: DateTime<Utc>,
    pub message_count: usize,
}

impl<'a> RecordRef<'a> {
    pub fn stamped(conversation: &'a Conversation, now: DateTime<Utc>) -> Self {
        Self {
            contact_name: &conversation.contact_name,
            messages: &conversation.messages,
            participants: &conversation.participants,
            last_updated: now,
            message_count: conversation.messages.len(),
        }
    }
}
