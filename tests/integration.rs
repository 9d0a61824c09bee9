//! Integration tests: export files on disk through the parser and into a
//! file-system archive.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::{TempDir, tempdir};
use whatsarchive::archive::archive_name;
use whatsarchive::config::{ParserConfig, StoreConfig};
use whatsarchive::parser::{ChatParser, read_export};
use whatsarchive::prelude::*;

const KHALID_EXPORT: &str = "\
[3/30/24, 15:23:34] Khalid Elm: \u{200e}Messages and calls are end-to-end encrypted. Only people in this chat can read, listen to, or share them.
[3/30/24, 15:23:34] Khalid Elm: Salam Mourad hanya wella ?
[3/30/24, 15:39:55] Mourad: Salam khalid
hanya hamdullah
[3/31/24, 00:39:42] Mourad: \u{200e}<attached: 00000033-AUDIO-2024-03-31-00-39-42.opus>

[3/31/24, 9:02] Khalid Elm: ok
";

const NOTICE_ONLY_EXPORT: &str = "\
[1/2/24, 10:00:00] Sara: \u{200e}Messages and calls are end-to-end encrypted. Only people in this chat can read, listen to, or share them.
[1/2/24, 10:01:00] Sara: \u{200e}Your security code with Sara changed. Tap to learn more.
";

fn store_in(dir: &TempDir) -> ArchiveStore {
    ArchiveStore::new(StoreConfig::new().with_base_dir(dir.path().join("home")))
}

fn write_export(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

// =========================================================================
// Parsing files
// =========================================================================

#[tokio::test]
async fn test_parse_file() {
    let dir = tempdir().unwrap();
    let path = write_export(&dir, "Khalid Elm_chat.txt", KHALID_EXPORT);

    let outcome = ChatParser::new().parse_file(&path).await.unwrap();

    assert_eq!(outcome.messages.len(), 5);
    assert_eq!(outcome.participants.participants, vec!["Khalid Elm", "Mourad"]);
    assert_eq!(outcome.participants.chat_title, "Khalid Elm & Mourad");
    assert_eq!(outcome.stats.unrecognized, 1);
    assert_eq!(outcome.stats.blank, 1);

    let audio = &outcome.messages[3];
    assert!(audio.is_media);
    assert_eq!(audio.media_type(), Some(MediaType::Audio));
    assert_eq!(
        audio.media_file_name(),
        Some("00000033-AUDIO-2024-03-31-00-39-42.opus")
    );
    assert_eq!(
        outcome.messages[4].timestamp.to_string(),
        "2024-03-31 09:02:00"
    );
}

#[tokio::test]
async fn test_parse_missing_file() {
    let dir = tempdir().unwrap();
    let err = ChatParser::new()
        .parse_file(dir.path().join("absent.txt"))
        .await
        .unwrap_err();
    assert!(err.is_io());
}

#[tokio::test]
async fn test_read_export_strips_bom_and_invalid_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bom.txt");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"[3/30/24, 15:23:34] Ann: caf\xE9\n");
    fs::write(&path, bytes).unwrap();

    let text = read_export(&path).await.unwrap();
    assert!(text.starts_with("[3/30/24"));

    let outcome = parse_chat_file(&text);
    assert_eq!(outcome.messages.len(), 1);
    assert_eq!(outcome.messages[0].content, "caf\u{FFFD}");
}

#[tokio::test]
async fn test_notice_only_export_has_unknown_title() {
    let dir = tempdir().unwrap();
    let path = write_export(&dir, "Sara_chat.txt", NOTICE_ONLY_EXPORT);

    let outcome = ChatParser::new().parse_file(&path).await.unwrap();
    assert_eq!(outcome.messages.len(), 2);
    assert!(outcome.participants.is_empty());
    assert_eq!(outcome.participants.chat_title, "Unknown");
}

#[tokio::test]
async fn test_custom_system_notice() {
    let export =
        "[1/2/24, 10:00] Bot: Disappearing messages were turned on\n[1/2/24, 10:01] Ann: hi\n";
    let parser = ChatParser::with_config(
        ParserConfig::new().with_system_notice("Disappearing messages"),
    );
    let outcome = parser.parse_str(export);
    assert_eq!(outcome.messages.len(), 2);
    assert_eq!(outcome.participants.participants, vec!["Ann"]);
}

// =========================================================================
// Archive on disk
// =========================================================================

#[tokio::test]
async fn test_import_round_trip() {
    let dir = tempdir().unwrap();
    let path = write_export(&dir, "Khalid Elm_chat.txt", KHALID_EXPORT);
    let store = store_in(&dir);

    let outcome = ChatParser::new().parse_file(&path).await.unwrap();
    let conversation = Conversation::from_parse_titled(outcome);
    let name = store.save(&conversation).await.unwrap();
    assert_eq!(name, "khalid_elm___mourad");

    let record = dir
        .path()
        .join("home")
        .join("conversations")
        .join("khalid_elm___mourad.json");
    assert!(record.is_file());
    let entries = fs::read_dir(record.parent().unwrap()).unwrap().count();
    assert_eq!(entries, 1, "temp files must not outlive the save");

    let all = store.load_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].contact_name, conversation.contact_name);
    assert_eq!(all[0].messages, conversation.messages);
    assert_eq!(all[0].participants, conversation.participants);
    assert_eq!(all[0].message_count, conversation.messages.len());
    assert!(all[0].last_updated.is_some());
}

#[tokio::test]
async fn test_record_json_shape() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store
        .save(&Conversation::from_parse(
            "Ann",
            parse_chat_file("[3/30/24, 15:23:34] Ann: Hello"),
        ))
        .await
        .unwrap();

    let raw = fs::read_to_string(store.record_path("Ann")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["contactName"], "Ann");
    assert_eq!(value["messageCount"], 1);
    assert_eq!(value["participants"][0], "Ann");
    assert_eq!(value["messages"][0]["timestamp"], "2024-03-30T15:23:34");
    assert_eq!(value["messages"][0]["isMedia"], false);
    assert!(value["lastUpdated"].is_string());
}

#[tokio::test]
async fn test_load_all_newest_first_on_disk() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    for name in ["A", "B", "C"] {
        store
            .save(&Conversation::new(name, vec![], vec![]))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let names: Vec<_> = store
        .load_all()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.contact_name)
        .collect();
    assert_eq!(names, vec!["C", "B", "A"]);
}

#[tokio::test]
async fn test_corrupt_record_is_skipped() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store
        .save(&Conversation::new("Good", vec![], vec![]))
        .await
        .unwrap();
    fs::write(store.conversations_dir().join("bad.json"), "not json").unwrap();

    let all = store.load_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].contact_name, "Good");
}

#[tokio::test]
async fn test_message_count_recomputed_on_load() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.initialize().await.unwrap();
    fs::write(
        store.conversations_dir().join("edited.json"),
        r#"{"contactName":"Edited","messages":[{"timestamp":"2024-03-30T15:23:34","sender":"Ann","content":"hi","isMedia":false}],"participants":["Ann"],"lastUpdated":"2024-04-01T09:00:00Z","messageCount":42}"#,
    )
    .unwrap();

    let all = store.load_all().await.unwrap();
    assert_eq!(all[0].message_count, 1);
}

#[tokio::test]
async fn test_name_collision_overwrites() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    store
        .save(&Conversation::new("Ann B.", vec![], vec!["Ann".into()]))
        .await
        .unwrap();
    assert!(store.exists("ann b!").await.unwrap());
    store
        .save(&Conversation::new("ann b!", vec![], vec!["Bee".into()]))
        .await
        .unwrap();

    let all = store.load_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].contact_name, "ann b!");
    assert_eq!(archive_name(&all[0].contact_name), "ann_b_");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_overlapping_saves_of_one_name() {
    let dir = tempdir().unwrap();
    let store = Arc::new(store_in(&dir));

    for round in 0..10 {
        let mut handles = Vec::new();
        for writer in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let conversation = Conversation::new(
                    "Ann",
                    vec![],
                    vec![format!("writer {round}-{writer}")],
                );
                store.save(&conversation).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "ann");
        }

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].participants[0].starts_with(&format!("writer {round}-")));
    }

    let names: Vec<_> = fs::read_dir(store.conversations_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["ann.json".to_string()]);
}

#[tokio::test]
async fn test_delete_and_clear() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store
        .save(&Conversation::new("Khalid Elm!", vec![], vec![]))
        .await
        .unwrap();
    store
        .save(&Conversation::new("Mourad", vec![], vec![]))
        .await
        .unwrap();

    assert!(store.delete("Khalid Elm!").await.unwrap());
    assert!(!store.record_path("Khalid Elm!").exists());
    assert!(!store.delete("Khalid Elm!").await.unwrap());

    assert!(store.clear_all().await.unwrap());
    assert!(!store.clear_all().await.unwrap());
    assert!(store.conversations_dir().is_dir());
    assert!(store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_operations_before_initialize() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    assert!(store.load_all().await.unwrap().is_empty());
    assert!(store.load("Ann").await.unwrap().is_none());
    assert!(!store.delete("Ann").await.unwrap());
    assert!(!store.clear_all().await.unwrap());
}

#[tokio::test]
async fn test_unwritable_base_dir() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "x").unwrap();

    let store = ArchiveStore::new(StoreConfig::new().with_base_dir(blocker.join("home")));
    let err = store
        .save(&Conversation::new("Ann", vec![], vec![]))
        .await
        .unwrap_err();
    assert!(err.is_storage_init());
}
