//! Configuration types for the parser and the archive store.
//!
//! Both structs follow the same builder style and are serde-serializable so
//! they can be embedded in a host application's own settings file.
//!
//! # Example
//!
//! ```rust
//! use whatsarchive::config::{ParserConfig, StoreConfig};
//!
//! let parser = ParserConfig::new().with_fix_encoding(true);
//! let store = StoreConfig::new().with_base_dir("/tmp/whatsarchive");
//!
//! assert!(parser.fix_encoding);
//! assert!(store.conversations_dir().ends_with("conversations"));
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the default storage base directory.
pub const HOME_ENV: &str = "WHATSARCHIVE_HOME";

/// Content phrases that mark a line as a service notice rather than
/// something a participant wrote.
pub const DEFAULT_SYSTEM_NOTICES: &[&str] = &[
    "Messages and calls are end-to-end encrypted",
    "Messages to this group are now secured with end-to-end encryption",
    "Your security code with",
];

/// Configuration for export parsing.
///
/// # Example
///
/// ```rust
/// use whatsarchive::config::ParserConfig;
///
/// let config = ParserConfig::new()
///     .with_system_notice("This chat is with a business account");
/// assert!(config.is_system_notice("This chat is with a business account. Tap to learn more."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Phrases whose presence in a message body excludes its sender from
    /// the participant set (default: [`DEFAULT_SYSTEM_NOTICES`])
    pub system_notices: Vec<String>,

    /// Repair Windows-1252 mojibake line by line before classifying (default: false)
    pub fix_encoding: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            system_notices: DEFAULT_SYSTEM_NOTICES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            fix_encoding: false,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a system-notice phrase.
    #[must_use]
    pub fn with_system_notice(mut self, phrase: impl Into<String>) -> Self {
        self.system_notices.push(phrase.into());
        self
    }

    /// Replaces the system-notice phrases.
    #[must_use]
    pub fn with_system_notices<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.system_notices = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables mojibake repair.
    #[must_use]
    pub fn with_fix_encoding(mut self, enabled: bool) -> Self {
        self.fix_encoding = enabled;
        self
    }

    /// Returns `true` if `content` contains any configured notice phrase.
    pub fn is_system_notice(&self, content: &str) -> bool {
        self.system_notices
            .iter()
            .any(|phrase| !phrase.is_empty() && content.contains(phrase.as_str()))
    }
}

/// Configuration for the archive store.
///
/// Records live in `<base_dir>/<conversations_dir_name>/<archive name>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base directory (default: see [`default_base_dir`])
    pub base_dir: PathBuf,

    /// Name of the records sub-directory (default: "conversations")
    pub conversations_dir_name: String,

    /// Write indented JSON (default: false)
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            conversations_dir_name: "conversations".to_string(),
            pretty: false,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base directory.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Sets the records sub-directory name.
    #[must_use]
    pub fn with_conversations_dir_name(mut self, name: impl Into<String>) -> Self {
        self.conversations_dir_name = name.into();
        self
    }

    /// Enables or disables indented JSON output.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the `*.json` records.
    pub fn conversations_dir(&self) -> PathBuf {
        self.base_dir.join(&self.conversations_dir_name)
    }
}

/// Resolves the default base directory:
/// 1. `$WHATSARCHIVE_HOME`
/// 2. `<platform data dir>/whatsarchive` (e.g. `~/.local/share/whatsarchive`)
/// 3. `./whatsarchive`
pub fn default_base_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("whatsarchive")
}
