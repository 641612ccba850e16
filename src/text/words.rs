//! Word spans inside a sentence.
//!
//! Spans alternate between words and whitespace runs and cover the sentence
//! with no gaps or overlaps. Offsets are UTF-8 byte offsets.

/// A run of either non-whitespace or whitespace characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub len: usize,
    pub is_whitespace: bool,
}

impl WordSpan {
    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether `offset` falls in `[start, start + len)`.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// The slice of `text` this span covers.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end()]
    }
}

/// Partition `text` into word and whitespace spans.
pub fn word_spans(text: &str) -> Vec<WordSpan> {
    let mut spans: Vec<WordSpan> = Vec::new();

    for (offset, c) in text.char_indices() {
        let is_whitespace = c.is_whitespace();
        match spans.last_mut() {
            Some(last) if last.is_whitespace == is_whitespace => last.len += c.len_utf8(),
            _ => spans.push(WordSpan {
                start: offset,
                len: c.len_utf8(),
                is_whitespace,
            }),
        }
    }

    spans
}

/// Byte offsets where words start. This is where a speech engine reports boundaries.
pub fn word_starts(text: &str) -> Vec<usize> {
    word_spans(text)
        .into_iter()
        .filter(|span| !span.is_whitespace)
        .map(|span| span.start)
        .collect()
}

/// Clamp `offset` to `text` and snap it down to a char boundary.
///
/// The result is always a valid index into `text`, or `text.len()`.
pub fn clamp_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
