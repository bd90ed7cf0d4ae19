// src/digest.rs

use crate::ingest::types::VacancyItem;

/// Render items into the plain-text digest sent to sinks and HTTP callers.
/// One three-line block per item (title, link, published date as received),
/// blocks separated by a blank line. Empty input renders to an empty string.
pub fn render(items: &[VacancyItem]) -> String {
    let blocks: Vec<String> = items
        .iter()
        .map(|it| format!("🔹 {}\n📎 {}\n🕒 {}", it.title, it.link, it.published_raw))
        .collect();
    blocks.join("\n\n")
}
