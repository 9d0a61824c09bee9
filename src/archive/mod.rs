//! Persistent conversation archive.
//!
//! - [`naming`] maps display names to record names
//! - [`conversation`] is the stored record type
//! - [`backend`] abstracts the storage medium
//! - [`store`] implements save/list/delete on top of a backend

pub mod backend;
pub mod conversation;
pub mod naming;
pub mod store;

pub use backend::{FsBackend, MemoryBackend, StorageBackend};
pub use conversation::Conversation;
pub use naming::{MAX_ARCHIVE_NAME_LEN, archive_name, record_file_name};
pub use store::ArchiveStore;
