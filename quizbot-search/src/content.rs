//! HTML content extraction: paragraph text only, cleaned for prompting.
//!
//! Pages are reduced to the text of their first few `<p>` elements in
//! document order. The joined text has citation markers like `[12]` removed
//! and all whitespace runs collapsed to single spaces.

use crate::types::NO_ADDITIONAL_INFORMATION;
use scraper::{Html, Selector};

/// Separator placed between paragraphs before cleaning.
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Extract up to `max_paragraphs` paragraphs from `html` as one cleaned string.
///
/// Returns [`NO_ADDITIONAL_INFORMATION`] when the page yields no paragraph
/// text, so a source is never silently dropped from the prompt.
pub fn extract_paragraphs(html: &str, max_paragraphs: usize) -> String {
    let joined = paragraph_texts(html, max_paragraphs).join(PARAGRAPH_SEPARATOR);
    let cleaned = clean_text(&joined);
    // Checked after cleaning: a page of bare markers like `<p>[1]</p>` still
    // gets the sentinel rather than an empty snippet.
    if cleaned.is_empty() {
        NO_ADDITIONAL_INFORMATION.to_owned()
    } else {
        cleaned
    }
}

/// Trimmed text of the first `max_paragraphs` `<p>` elements.
fn paragraph_texts(html: &str, max_paragraphs: usize) -> Vec<String> {
    let Ok(selector) = Selector::parse("p") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .take(max_paragraphs)
        .map(|p| p.text().collect::<String>().trim().to_owned())
        .collect()
}

/// Strip `[123]`-style citation markers, collapse whitespace runs to a single
/// space and trim.
///
/// Applying this to its own output returns the input unchanged.
pub fn clean_text(text: &str) -> String {
    let stripped = strip_citation_markers(text);
    collapse_whitespace(&stripped)
}

/// Remove every bracketed all-digit marker, including ones that only become
/// markers once an inner marker is removed (`[1[2]]`).
fn strip_citation_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == ']' {
            if let Some(start) = trailing_marker_start(&out) {
                out.truncate(start);
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Byte offset of a trailing `[digits` in `buf`, if there is one.
fn trailing_marker_start(buf: &str) -> Option<usize> {
    let digits_start = buf
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    let bracket = digits_start.checked_sub(1)?;
    (buf.as_bytes()[bracket] == b'[').then_some(bracket)
}

fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}
