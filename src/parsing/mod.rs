//! Building blocks of the export parser.
//!
//! - [`line`] - recognizes message-start lines and captures their fields
//! - [`normalize`] - timestamps and media classification
//! - [`participants`] - participant set and chat title
//! - [`encoding`] - lossy decoding and mojibake repair
//!
//! [`ChatParser`](crate::parser::ChatParser) wires these together; they are
//! public so callers can classify single lines without a full parse.

pub mod encoding;
pub mod line;
pub mod normalize;
pub mod participants;

pub use encoding::{decode_export, repair_mojibake};
pub use line::{RawFields, classify_line};
pub use normalize::{MediaContent, classify_media, normalize, parse_timestamp};
pub use participants::{ChatParticipants, TITLE_SEPARATOR, UNKNOWN_TITLE, title_for};
