//! # whatsarchive
//!
//! Parses WhatsApp "Export chat" TXT files into structured messages and keeps
//! them in a small on-disk archive.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use whatsarchive::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let outcome = ChatParser::new().parse_file("Khalid Elm_chat.txt").await?;
//! println!(
//!     "{}: {} messages, {} lines skipped",
//!     outcome.participants.chat_title,
//!     outcome.messages.len(),
//!     outcome.stats.skipped()
//! );
//!
//! let store = ArchiveStore::open_default();
//! store.save(&Conversation::from_parse_titled(outcome)).await?;
//!
//! for conversation in store.load_all().await? {
//!     println!("{} ({})", conversation.contact_name, conversation.message_count);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported format
//!
//! Only the bracketed layout is recognized:
//!
//! ```text
//! [3/30/24, 15:23:34] Khalid Elm: Salam Mourad hanya wella ?
//! [3/30/24, 15:25] Mourad: <attached: 00000012-PHOTO-2024-03-30.jpg>
//! ```
//!
//! Any other line (including continuation lines of multi-line messages) is
//! counted and dropped.
//!
//! ## Module Structure
//!
//! - [`parser`] - [`ChatParser`], [`ParseOutcome`](parser::ParseOutcome),
//!   [`ParseStats`](parser::ParseStats)
//! - [`parsing`] - line classifier, normalizer, participant derivation, decoding
//! - [`message`] - [`ParsedMessage`], [`MediaType`]
//! - [`archive`] - [`ArchiveStore`], [`Conversation`], archive naming, storage backends
//! - [`config`] - [`ParserConfig`](config::ParserConfig), [`StoreConfig`](config::StoreConfig)
//! - [`error`] - [`ArchiveError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod message;
pub mod parser;
pub mod parsing;

// Re-export the main types at the crate root for convenience
pub use archive::{ArchiveStore, Conversation};
pub use error::{ArchiveError, Result};
pub use message::{MediaType, ParsedMessage};
pub use parser::{ChatParser, parse_chat_file};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use whatsarchive::prelude::*;
/// ```
pub mod prelude {
    pub use crate::archive::{ArchiveStore, Conversation, StorageBackend, archive_name};
    pub use crate::config::{ParserConfig, StoreConfig};
    pub use crate::error::{ArchiveError, Result};
    pub use crate::message::{MediaType, ParsedMessage};
    pub use crate::parser::{
        ChatParser, ParseOutcome, ParseStats, extract_participants, parse_chat_file,
    };
    pub use crate::parsing::ChatParticipants;
}
