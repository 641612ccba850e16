//! Sentence segmentation.
//!
//! [`split_sentences`] is the one sentence rule in the crate. The flat pass in
//! [`segment`] feeds the narration controller; the renderer runs the same rule
//! per block. Index assignment happens only in [`segment`].

use crate::defaults::MIN_SENTENCE_CHARS;
use crate::text::markup::strip_markup;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Sentence-ending punctuation followed by whitespace.
///
/// A cut is made right after the punctuation mark, so it stays with the
/// sentence it ends and the whitespace run is dropped.
static RE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// One narratable sentence of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    /// Position in the article's sentence sequence. Stable for the session.
    pub index: usize,
    /// Trimmed plain text.
    pub text: String,
}

/// Split plain text into sentence fragments.
///
/// Fragments are trimmed, and fragments shorter than [`MIN_SENTENCE_CHARS`]
/// characters are discarded. Text without any boundary comes back whole.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;

    for boundary in RE_BOUNDARY.find_iter(text) {
        // The punctuation mark is ASCII, one byte.
        let cut = boundary.start() + 1;
        push_fragment(&mut fragments, &text[start..cut]);
        start = boundary.end();
    }
    push_fragment(&mut fragments, &text[start..]);

    fragments
}

fn push_fragment<'a>(fragments: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if trimmed.chars().count() >= MIN_SENTENCE_CHARS {
        fragments.push(trimmed);
    }
}

/// Segment an HTML article body into indexed sentences.
///
/// Empty or markup-only input yields an empty list.
pub fn segment(html: &str) -> Vec<Sentence> {
    index_sentences(split_sentences(&strip_markup(html)))
}

fn index_sentences<'a>(fragments: impl IntoIterator<Item = &'a str>) -> Vec<Sentence> {
    fragments
        .into_iter()
        .enumerate()
        .map(|(index, text)| Sentence {
            index,
            text: text.to_string(),
        })
        .collect()
}
