//! Durable conversation archive.
//!
//! Each conversation is one JSON record named after its
//! [archive name](super::naming::archive_name), under
//! `<base>/conversations/`.
//!
//! # Example
//!
//! ```rust,no_run
//! use whatsarchive::archive::{ArchiveStore, Conversation};
//! use whatsarchive::config::StoreConfig;
//! use whatsarchive::parser::parse_chat_file;
//!
//! # async fn example() -> whatsarchive::Result<()> {
//! let store = ArchiveStore::new(StoreConfig::new().with_base_dir("/tmp/whatsarchive"));
//!
//! let outcome = parse_chat_file("[3/30/24, 15:23:34] Ann: Hello");
//! let name = store.save(&Conversation::from_parse("Ann", outcome)).await?;
//! assert_eq!(name, "ann");
//!
//! for conversation in store.load_all().await? {
//!     println!("{} ({} messages)", conversation.contact_name, conversation.message_count);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Semantics
//!
//! - `save` fully replaces whatever was stored under the same archive name,
//!   including an unrelated conversation whose name normalizes identically
//! - `load_all` skips unreadable records instead of failing
//! - `delete` and `clear_all` are idempotent
//! - No operation retries, and concurrent saves to one name race with
//!   last-writer-wins

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::StoreConfig;
use crate::error::{ArchiveError, Result};

use super::backend::{FsBackend, StorageBackend};
use super::conversation::{Conversation, RecordRef};
use super::naming::{archive_name, archive_name_from_file, record_file_name};

/// Conversation archive over a [`StorageBackend`].
#[derive(Debug)]
pub struct ArchiveStore<B = FsBackend> {
    backend: B,
    config: StoreConfig,
}

impl ArchiveStore<FsBackend> {
    /// Creates a store on the local file system.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_backend(FsBackend::new(), config)
    }

    /// Creates a store at the default location (see
    /// [`default_base_dir`](crate::config::default_base_dir)).
    pub fn open_default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl<B: StorageBackend> ArchiveStore<B> {
    pub fn with_backend(backend: B, config: StoreConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Directory holding the records.
    pub fn conversations_dir(&self) -> PathBuf {
        self.config.conversations_dir()
    }

    /// Path of the record for a display name.
    pub fn record_path(&self, display_name: &str) -> PathBuf {
        self.path_for_archive(&archive_name(display_name))
    }

    fn path_for_archive(&self, archive_name: &str) -> PathBuf {
        self.conversations_dir().join(record_file_name(archive_name))
    }

    /// Ensures the base and conversations directories exist.
    pub async fn initialize(&self) -> Result<()> {
        for dir in [self.config.base_dir().to_path_buf(), self.conversations_dir()] {
            self.backend
                .create_dir_all(&dir)
                .await
                .map_err(|source| ArchiveError::storage_init(dir.clone(), source))?;
        }
        Ok(())
    }

    /// Writes `conversation`, replacing any record with the same archive
    /// name. Returns the archive name used.
    ///
    /// The stored copy carries a fresh `lastUpdated` and a `messageCount`
    /// equal to `messages.len()`; `conversation` itself is not modified.
    pub async fn save(&self, conversation: &Conversation) -> Result<String> {
        self.initialize().await?;

        let name = conversation.archive_name();
        let path = self.path_for_archive(&name);
        let record = RecordRef::stamped(conversation, Utc::now());

        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(&record)?
        } else {
            serde_json::to_vec(&record)?
        };

        self.backend
            .write(&path, &bytes)
            .await
            .map_err(|source| ArchiveError::storage("write", &path, source))?;

        tracing::info!(
            archive = %name,
            contact = %conversation.contact_name,
            messages = record.message_count,
            "saved conversation"
        );
        Ok(name)
    }

    /// Loads every readable record, most recently saved first.
    ///
    /// Records without `lastUpdated` sort last; equal timestamps fall back
    /// to archive-name order.
    pub async fn load_all(&self) -> Result<Vec<Conversation>> {
        let dir = self.conversations_dir();
        if !self.path_exists(&dir).await? {
            return Ok(Vec::new());
        }

        let mut loaded = Vec::new();
        for file_name in self.record_file_names(&dir).await? {
            let path = dir.join(&file_name);
            match self.read_record(&path).await {
                Ok(conversation) => loaded.push((file_name, conversation)),
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unreadable archive record"
                    );
                }
            }
        }

        loaded.sort_by(|(a_name, a), (b_name, b)| {
            b.last_updated_or_epoch()
                .cmp(&a.last_updated_or_epoch())
                .then_with(|| a_name.cmp(b_name))
        });

        Ok(loaded.into_iter().map(|(_, conversation)| conversation).collect())
    }

    /// Loads the record for `display_name`, if one exists.
    pub async fn load(&self, display_name: &str) -> Result<Option<Conversation>> {
        let path = self.record_path(display_name);
        if !self.path_exists(&path).await? {
            return Ok(None);
        }
        self.read_record(&path).await.map(Some)
    }

    /// Returns whether a record exists under `display_name`'s archive name.
    ///
    /// Useful before `save` to detect that a different conversation would be
    /// overwritten.
    pub async fn exists(&self, display_name: &str) -> Result<bool> {
        self.path_exists(&self.record_path(display_name)).await
    }

    /// Removes the record for `display_name`. Returns whether one was removed.
    pub async fn delete(&self, display_name: &str) -> Result<bool> {
        let path = self.record_path(display_name);
        let removed = self
            .backend
            .remove_file(&path)
            .await
            .map_err(|source| ArchiveError::storage("delete", &path, source))?;

        if removed {
            tracing::info!(path = %path.display(), "deleted conversation");
        } else {
            tracing::debug!(path = %path.display(), "nothing to delete");
        }
        Ok(removed)
    }

    /// Removes every record and leaves an empty conversations directory.
    /// Returns whether any record existed.
    pub async fn clear_all(&self) -> Result<bool> {
        let dir = self.conversations_dir();
        let had_records = self.path_exists(&dir).await?
            && !self.record_file_names(&dir).await?.is_empty();

        self.backend
            .remove_dir_all(&dir)
            .await
            .map_err(|source| ArchiveError::storage("clear", &dir, source))?;
        self.initialize().await?;

        tracing::info!(dir = %dir.display(), had_records, "cleared archive");
        Ok(had_records)
    }

    async fn path_exists(&self, path: &Path) -> Result<bool> {
        self.backend
            .exists(path)
            .await
            .map_err(|source| ArchiveError::storage("inspect", path, source))
    }

    async fn record_file_names(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .backend
            .list_file_names(dir)
            .await
            .map_err(|source| ArchiveError::storage("list", dir, source))?
            .into_iter()
            .filter(|name| archive_name_from_file(name).is_some())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn read_record(&self, path: &Path) -> Result<Conversation> {
        let bytes = self
            .backend
            .read(path)
            .await
            .map_err(|source| ArchiveError::storage("read", path, source))?;

        let mut conversation: Conversation = serde_json::from_slice(&bytes)?;
        conversation.refresh_message_count();
        Ok(conversation)
    }
}
