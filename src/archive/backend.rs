//! Storage capability used by the archive store.
//!
//! The store only needs a handful of path-keyed operations, collected in
//! [`StorageBackend`]. [`FsBackend`] maps them onto `tokio::fs`;
//! [`MemoryBackend`] keeps everything in process for tests and embedders
//! that bring their own persistence.
//!
//! Removal operations are idempotent: removing something absent returns
//! `Ok(false)` rather than an error.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

/// File-system operations the archive store depends on.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Creates `path` and any missing parents. Succeeds if it already exists.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Returns whether a file or directory exists at `path`.
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Lists the names of regular files directly inside `dir`.
    async fn list_file_names(&self, dir: &Path) -> io::Result<Vec<String>>;

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Writes `contents` to `path`, replacing any previous file.
    async fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Removes a file; `Ok(false)` when there was nothing to remove.
    async fn remove_file(&self, path: &Path) -> io::Result<bool>;

    /// Removes a directory tree; `Ok(false)` when there was nothing to remove.
    async fn remove_dir_all(&self, path: &Path) -> io::Result<bool>;
}

/// Backend on the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBackend;

impl FsBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Sequence for temp-file names, unique within this process.
static TMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn absent_is_false(result: io::Result<()>) -> io::Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl StorageBackend for FsBackend {
    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        fs::try_exists(path).await
    }

    async fn list_file_names(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut entries = fs::read_dir(dir).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            // non-UTF-8 names can never be archive records
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }

        Ok(names)
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path).await
    }

    /// Writes to a sibling `<name>.<pid>.<seq>.tmp` file, then renames it
    /// over `path`. Every write gets its own temp file; among overlapping
    /// writes to one path the last rename wins.
    async fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let file_name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(format!(
            ".{}.{}.tmp",
            process::id(),
            TMP_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        ));
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, contents).await?;
        if let Err(err) = fs::rename(&tmp_path, path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err);
        }
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> io::Result<bool> {
        absent_is_false(fs::remove_file(path).await)
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<bool> {
        absent_is_false(fs::remove_dir_all(path).await)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

/// In-process backend.
///
/// [`set_read_only`](Self::set_read_only) makes every mutating operation
/// fail with `PermissionDenied`, which is how tests simulate an unwritable
/// medium.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    read_only: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of files currently held.
    pub async fn file_count(&self) -> usize {
        self.state.lock().await.files.len()
    }

    fn check_writable(&self) -> io::Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage is read-only",
            ))
        } else {
            Ok(())
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().await;
        let missing: Vec<PathBuf> = path
            .ancestors()
            .filter(|dir| !dir.as_os_str().is_empty() && !state.dirs.contains(*dir))
            .map(Path::to_path_buf)
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        self.check_writable()?;
        state.dirs.extend(missing);
        Ok(())
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let state = self.state.lock().await;
        Ok(state.dirs.contains(path) || state.files.contains_key(path))
    }

    async fn list_file_names(&self, dir: &Path) -> io::Result<Vec<String>> {
        let state = self.state.lock().await;
        if !state.dirs.contains(dir) {
            return Err(not_found(dir));
        }

        Ok(state
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect())
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let state = self.state.lock().await;
        state.files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        match path.parent() {
            Some(parent) if state.dirs.contains(parent) => {}
            Some(parent) => return Err(not_found(parent)),
            None => return Err(not_found(path)),
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> io::Result<bool> {
        self.check_writable()?;
        Ok(self.state.lock().await.files.remove(path).is_some())
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<bool> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let existed = state.dirs.contains(path);

        state.dirs.retain(|dir| !dir.starts_with(path));
        let files_before = state.files.len();
        state.files.retain(|file, _| !file.starts_with(path));

        Ok(existed || state.files.len() != files_before)
    }
}
