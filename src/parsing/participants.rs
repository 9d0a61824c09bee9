//! Participant set and chat title derivation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::message::ParsedMessage;

/// Title used when no participant could be identified.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Separator between participant names in a derived title.
pub const TITLE_SEPARATOR: &str = " & ";

/// Distinct senders of a chat, in first-seen order, plus a display title.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatParticipants {
    pub participants: Vec<String>,
    pub chat_title: String,
}

impl ChatParticipants {
    /// Collects senders from `messages`, skipping any message whose body is
    /// a configured system notice.
    ///
    /// A sender who only ever appears on notice lines is not a participant.
    pub fn from_messages<'a, I>(messages: I, config: &ParserConfig) -> Self
    where
        I: IntoIterator<Item = &'a ParsedMessage>,
    {
        let mut seen = HashSet::new();
        let mut participants = Vec::new();

        for message in messages {
            if config.is_system_notice(&message.content) {
                continue;
            }
            if seen.insert(message.sender.as_str()) {
                participants.push(message.sender.clone());
            }
        }

        Self::from_names(participants)
    }

    /// Wraps an already ordered, duplicate-free list and derives its title.
    pub fn from_names(participants: Vec<String>) -> Self {
        let chat_title = title_for(&participants);
        Self {
            participants,
            chat_title,
        }
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains(&self, sender: &str) -> bool {
        self.participants.iter().any(|p| p == sender)
    }

    /// Returns `true` when the title is the [`UNKNOWN_TITLE`] sentinel.
    pub fn is_unknown(&self) -> bool {
        self.participants.is_empty()
    }
}

/// `"A & B & C"` for several names, the name itself for one, `"Unknown"` for none.
///
/// ```
/// use whatsarchive::parsing::title_for;
///
/// assert_eq!(title_for(&["Khalid Elm".into(), "Mourad".into()]), "Khalid Elm & Mourad");
/// assert_eq!(title_for(&["Mourad".into()]), "Mourad");
/// assert_eq!(title_for(&[]), "Unknown");
/// ```
pub fn title_for(participants: &[String]) -> String {
    match participants {
        [] => UNKNOWN_TITLE.to_string(),
        [only] => only.clone(),
        many => many.join(TITLE_SEPARATOR),
    }
}
