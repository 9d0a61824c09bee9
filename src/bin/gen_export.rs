//! Synthetic WhatsApp export generator for benchmarks and stress tests.
//!
//! Usage: cargo run --features gen-test --bin gen_export -- [lines] [output]
//! Example: cargo run --features gen-test --bin gen_export -- 100000 heavy_chat.txt

use rand::Rng;
use rand::seq::SliceRandom;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};

const SENDERS: &[&str] = &[
    "Khalid Elm",
    "Mourad",
    "Иван",
    "村上",
    "محمد",
    "🔥FireUser🔥",
    "Ann-Marie O'Neil",
];

const EMOJIS: &[&str] = &["😀", "😂", "🤔", "🔥", "👍", "❤️", "🏳️‍🌈", "👨‍👩‍👧‍👦"];

const ATTACHMENTS: &[&str] = &[
    "00000012-PHOTO-2024-03-30-15-23-34.jpg",
    "00000013-VIDEO-2024-03-30-15-24-01.mp4",
    "00000014-AUDIO-2024-03-30-15-24-40.opus",
    "00000015-Invoice.pdf",
];

const OMITTED: &[&str] = &["<Media omitted>", "image omitted", "sticker omitted", "GIF omitted"];

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args.get(2).map_or("heavy_chat.txt", String::as_str);

    println!("🧪 Export Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Lines:  {count}");
    println!("   Output: {output}");
    println!();

    let file = File::create(output)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);
    let mut rng = rand::thread_rng();

    let start = std::time::Instant::now();
    let mut bytes_written: usize = 0;

    if count > 0 {
        let notice = "[1/1/24, 00:00:00] Khalid Elm: \u{200e}Messages and calls are end-to-end encrypted. Only people in this chat can read, listen to, or share them.\n";
        writer.write_all(notice.as_bytes())?;
        bytes_written += notice.len();
    }

    for i in 1..count {
        let line = generate_line(&mut rng, i);
        bytes_written += line.len();
        writer.write_all(line.as_bytes())?;

        if (i + 1) % 10000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} lines/s)",
                i + 1,
                count,
                bytes_written as f64 / 1_000_000.0,
                (i + 1) as f64 / elapsed
            );
        }
    }

    writer.flush()?;

    let elapsed = start.elapsed();
    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", bytes_written as f64 / 1_000_000.0);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());
    Ok(())
}

fn timestamp(index: usize) -> String {
    let month = (index / 2000) % 12 + 1;
    let day = (index / 100) % 28 + 1;
    let hour = (index / 60) % 24;
    let minute = index % 60;
    if index % 3 == 0 {
        format!("[{month}/{day}/24, {hour}:{minute:02}]")
    } else {
        format!("[{month}/{day}/24, {hour:02}:{minute:02}:{:02}]", index % 60)
    }
}

fn generate_line(rng: &mut impl Rng, index: usize) -> String {
    let sender = SENDERS.choose(rng).copied().unwrap_or("Mourad");
    let ts = timestamp(index);

    match index % 25 {
        0 => format!("{ts} {sender}: <attached: {}>\n", pick(rng, ATTACHMENTS)),
        1 => format!("{ts} {sender}: \u{200e}{}\n", pick(rng, OMITTED)),
        2 => "and this continues the previous message\n".to_string(),
        3 => "\n".to_string(),
        4 => "[13/45/24, 25:00:00] Nobody: impossible date\n".to_string(),
        5 => "Not a message line at all\n".to_string(),
        6 => {
            let emojis: String = (0..20).map(|_| pick(rng, EMOJIS)).collect();
            format!("{ts} {sender}: Emoji spam {emojis}\n")
        }
        7 => format!("{ts} {sender}: time: {index}: colons in content\n"),
        8 => format!("{ts} {sender}: Кириллица и 日本語 #{index}\n"),
        _ => format!("{ts} {sender}: Normal message #{index} with some text\n"),
    }
}

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}
