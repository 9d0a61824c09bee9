//! # whatsarchive CLI
//!
//! Command-line interface for the whatsarchive library.

use std::path::Path;
use std::process;

use chrono::{DateTime, Utc};
use clap::Parser as ClapParser;
use serde::Serialize;

use whatsarchive::cli::{Args, Command};
use whatsarchive::config::{ParserConfig, StoreConfig};
use whatsarchive::parser::{ChatParser, ParseOutcome, contact_name_from_file_name};
use whatsarchive::{ArchiveError, ArchiveStore, Conversation, ParsedMessage};

#[tokio::main]
async fn main() {
    let args = <Args as ClapParser>::parse();
    setup_logging(args.log_level.as_filter());

    match run(args).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn setup_logging(level: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Runs one subcommand; `Ok(false)` means it completed but should exit non-zero.
async fn run(args: Args) -> Result<bool, ArchiveError> {
    let store_config = match args.home {
        Some(home) => StoreConfig::new().with_base_dir(home),
        None => StoreConfig::new(),
    };
    let store = ArchiveStore::new(store_config.with_pretty(true));

    match args.command {
        Command::Parse {
            file,
            json,
            fix_encoding,
        } => {
            let outcome = parser(fix_encoding).parse_file(&file).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_summary(&file, &outcome);
            }
        }

        Command::Import {
            file,
            name,
            fix_encoding,
        } => {
            let outcome = parser(fix_encoding).parse_file(&file).await?;
            let contact_name = name.unwrap_or_else(|| import_name(&file, &outcome));

            if store.exists(&contact_name).await? {
                tracing::warn!(contact = %contact_name, "replacing existing archive");
            }

            let conversation = Conversation::from_parse(contact_name, outcome);
            let archive = store.save(&conversation).await?;
            println!(
                "Imported {} messages as '{}' ({archive})",
                conversation.len(),
                conversation.contact_name
            );
        }

        Command::List { json } => {
            let conversations = store.load_all().await?;
            if json {
                let entries: Vec<ListEntry<'_>> =
                    conversations.iter().map(ListEntry::from).collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if conversations.is_empty() {
                println!("No archived conversations");
            } else {
                for conversation in &conversations {
                    println!(
                        "{}\t{} messages\t{}",
                        conversation.contact_name,
                        conversation.message_count,
                        format_updated(conversation.last_updated)
                    );
                }
            }
        }

        Command::Show { name, json } => {
            let conversation = store
                .load(&name)
                .await?
                .ok_or_else(|| ArchiveError::not_found(&name))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&conversation)?);
            } else {
                println!("{}", conversation.contact_name);
                println!("Participants: {}", conversation.participants.join(", "));
                println!();
                for message in &conversation.messages {
                    println!("{}", format_message(message));
                }
            }
        }

        Command::Delete { name } => {
            if !store.delete(&name).await? {
                eprintln!("No archive named '{name}'");
                return Ok(false);
            }
            println!("Deleted '{name}'");
        }

        Command::Clear => {
            if store.clear_all().await? {
                println!("Archive cleared");
            } else {
                println!("Archive was already empty");
            }
        }
    }

    Ok(true)
}

fn parser(fix_encoding: bool) -> ChatParser {
    ChatParser::with_config(ParserConfig::new().with_fix_encoding(fix_encoding))
}

/// Chat title, or the export's file name when no participant was found.
fn import_name(file: &Path, outcome: &ParseOutcome) -> String {
    if !outcome.participants.is_unknown() {
        return outcome.participants.chat_title.clone();
    }
    file.file_name()
        .and_then(|name| name.to_str())
        .map_or_else(
            || outcome.participants.chat_title.clone(),
            contact_name_from_file_name,
        )
}

fn print_summary(file: &Path, outcome: &ParseOutcome) {
    let stats = &outcome.stats;
    println!("File:          {}", file.display());
    println!("Title:         {}", outcome.participants.chat_title);
    println!("Participants:  {}", outcome.participants.participants.join(", "));
    println!("Messages:      {}", outcome.messages.len());
    println!("Lines:         {}", stats.lines);
    println!("  blank:          {}", stats.blank);
    println!("  unrecognized:   {}", stats.unrecognized);
    println!("  bad timestamp:  {}", stats.invalid_timestamps);
}

fn format_message(message: &ParsedMessage) -> String {
    let timestamp = message.timestamp().format("%Y-%m-%d %H:%M:%S");
    match (message.media_type(), message.media_file_name()) {
        (Some(kind), Some(file)) => format!("[{timestamp}] {}: <{kind}: {file}>", message.sender()),
        (Some(kind), None) => format!("[{timestamp}] {}: <{kind}>", message.sender()),
        (None, _) => format!("[{timestamp}] {}: {}", message.sender(), message.content()),
    }
}

fn format_updated(last_updated: Option<DateTime<Utc>>) -> String {
    last_updated.map_or_else(|| "-".to_string(), |at| at.to_rfc3339())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListEntry<'a> {
    contact_name: &'a str,
    archive_name: String,
    message_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Conversation> for ListEntry<'a> {
    fn from(conversation: &'a Conversation) -> Self {
        Self {
            contact_name: &conversation.contact_name,
            archive_name: conversation.archive_name(),
            message_count: conversation.message_count,
            last_updated: conversation.last_updated,
        }
    }
}
