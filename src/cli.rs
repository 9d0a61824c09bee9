//! Command-line interface definition using clap.
//!
//! - [`Args`] - global flags and the chosen subcommand
//! - [`Command`] - the subcommands
//! - [`LogLevel`] - verbosity for `--log-level`

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::HOME_ENV;

/// Parse WhatsApp TXT exports and keep them in a local archive.
#[derive(Parser, Debug, Clone)]
#[command(name = "whatsarchive")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    whatsarchive parse 'Khalid Elm_chat.txt'
    whatsarchive parse _chat.txt --json
    whatsarchive import _chat.txt --name 'Khalid Elm'
    whatsarchive list
    whatsarchive show 'Khalid Elm' --json
    whatsarchive delete 'Khalid Elm'")]
pub struct Args {
    /// Archive base directory
    #[arg(long, global = true, env = HOME_ENV, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Log verbosity (RUST_LOG takes precedence when set)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Parse an export and print a summary
    Parse {
        /// Path to the exported TXT file
        file: PathBuf,

        /// Print the full parse result as JSON
        #[arg(long)]
        json: bool,

        /// Repair UTF-8 text that was decoded as Windows-1252
        #[arg(long)]
        fix_encoding: bool,
    },

    /// Parse an export and save it to the archive
    Import {
        /// Path to the exported TXT file
        file: PathBuf,

        /// Contact name to store the conversation under
        #[arg(short, long)]
        name: Option<String>,

        /// Repair UTF-8 text that was decoded as Windows-1252
        #[arg(long)]
        fix_encoding: bool,
    },

    /// List archived conversations, newest first
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        json: bool,
    },

    /// Print one archived conversation
    Show {
        /// Contact name the conversation was saved under
        name: String,

        #[arg(long)]
        json: bool,
    },

    /// Delete one archived conversation
    #[command(alias = "rm")]
    Delete {
        /// Contact name the conversation was saved under
        name: String,
    },

    /// Delete every archived conversation
    Clear,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}
