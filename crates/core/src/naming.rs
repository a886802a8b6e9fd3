//! File and directory naming for generated decks.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex matching every character not allowed in a legal filename fragment.
static ILLEGAL_CHARS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());

/// Title used when the deck has no generated slides or the first title is blank.
pub const DEFAULT_TITLE: &str = "Presentation";

/// Extension of written decks.
pub const DECK_EXTENSION: &str = "pptx";

/// Characters removed from the first slide title to form the output file name.
const TITLE_STRIP_CHARS: &[char] = &[':', '/', '\\'];

/// Sanitize a topic into a fragment usable as a directory name.
///
/// Keeps word characters, whitespace and hyphens, trims the result and
/// replaces each remaining whitespace character with `_`.
pub fn legal_filename_fragment(topic: &str) -> String {
    let composed: String = topic.nfc().collect();
    let cleaned = ILLEGAL_CHARS_REGEX.replace_all(&composed, "");

    cleaned
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Longest output title in bytes, leaving room for the extension within the
/// usual 255-byte file name limit.
pub const MAX_TITLE_BYTES: usize = 200;

/// Derive the output title from the first slide's title.
///
/// Control characters are dropped along with the stripped characters, and
/// the result is cut to [`MAX_TITLE_BYTES`] on a character boundary.
pub fn output_title(first_slide_title: Option<&str>) -> String {
    let mut title: String = first_slide_title
        .unwrap_or_default()
        .chars()
        .filter(|c| !TITLE_STRIP_CHARS.contains(c) && !c.is_control())
        .collect();

    if title.len() > MAX_TITLE_BYTES {
        let mut end = MAX_TITLE_BYTES;
        while !title.is_char_boundary(end) {
            end -= 1;
        }
        title.truncate(end);
    }

    if title.trim().is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

/// File name for a deck with the given title.
pub fn deck_file_name(title: &str) -> String {
    format!("{}.{}", title, DECK_EXTENSION)
}
