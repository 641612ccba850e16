//! Active narration layout: blocks broken into sentence and word spans.
//!
//! The block pass re-runs the sentence rule per block, but indices always come
//! from the article's segmented sentence list. Block sentences are matched to
//! that list in order, so narration and highlighting share one index space.
//!
//! A block that ends without a terminator (a bare heading, a list item) is
//! glued to the following text by the flat pass. Every block piece of such a
//! sentence carries the same index and its byte offset into the sentence.

use crate::narration::state::Highlight;
use crate::render::tree::{RenderNode, SentenceNode, SentenceStyle, WordToken};
use crate::text::markup::blocks;
use crate::text::segmenter::{Sentence, split_sentences};
use crate::text::words::word_spans;

/// Lay out `html` for narration. Returns the nodes and the rendered index of
/// the highlighted sentence, if it made it into the layout.
///
/// Falls back to a single raw node when no block yields a sentence.
pub fn render_active(
    html: &str,
    sentences: &[Sentence],
    highlight: Highlight,
) -> (Vec<RenderNode>, Option<usize>) {
    let mut aligner = Aligner::new(sentences);
    let mut nodes = Vec::new();
    let mut scroll_target = None;

    for block in blocks(html) {
        let text = block.text();
        let mut sentence_nodes = Vec::new();

        for fragment in split_sentences(&text) {
            let piece = aligner.locate(fragment);
            let node = sentence_node(fragment, piece, highlight);
            if node.style == SentenceStyle::Active && scroll_target.is_none() {
                scroll_target = node.index;
            }
            sentence_nodes.push(node);
        }

        if !sentence_nodes.is_empty() {
            nodes.push(RenderNode::Block {
                tag: block.tag,
                sentences: sentence_nodes,
            });
        }
    }

    if nodes.is_empty() {
        return (
            vec![RenderNode::Raw {
                html: html.to_string(),
            }],
            None,
        );
    }
    (nodes, scroll_target)
}

/// Where a block fragment sits in the narrated sentence list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece {
    index: usize,
    /// Byte offset of the fragment inside the narrated sentence.
    base: usize,
}

/// Walks the global sentence list alongside the block pass.
struct Aligner<'a> {
    sentences: &'a [Sentence],
    cursor: usize,
    /// Position of a sentence spanning several blocks and how many bytes of
    /// it are already placed.
    partial: Option<(usize, usize)>,
}

impl<'a> Aligner<'a> {
    fn new(sentences: &'a [Sentence]) -> Self {
        Self {
            sentences,
            cursor: 0,
            partial: None,
        }
    }

    /// Place `fragment`, continuing a partly placed sentence first and
    /// otherwise searching forward from the last match.
    fn locate(&mut self, fragment: &str) -> Option<Piece> {
        if let Some((position, base)) = self.partial.take() {
            let sentence = &self.sentences[position];
            let rest = sentence.text.get(base..).unwrap_or_default();
            let piece = Piece {
                index: sentence.index,
                base,
            };
            if rest == fragment {
                return Some(piece);
            }
            if let Some(consumed) = leading_piece(rest, fragment) {
                self.partial = Some((position, base + consumed));
                return Some(piece);
            }
            tracing::debug!(
                at = sentence.index,
                fragment,
                "block pass left a split sentence unfinished"
            );
        }

        let found = self.sentences[self.cursor..]
            .iter()
            .position(|s| s.text == fragment || leading_piece(&s.text, fragment).is_some());
        let Some(offset) = found else {
            tracing::warn!(
                fragment,
                "block sentence has no narrated counterpart; rendering unhighlighted"
            );
            return None;
        };

        let position = self.cursor + offset;
        let sentence = &self.sentences[position];
        if offset > 0 {
            tracing::debug!(
                skipped = offset,
                at = sentence.index,
                "block pass skipped sentences outside blocks"
            );
        }
        self.cursor = position + 1;
        if let Some(consumed) = leading_piece(&sentence.text, fragment) {
            self.partial = Some((position, consumed));
        }
        Some(Piece {
            index: sentence.index,
            base: 0,
        })
    }
}

/// Bytes of `sentence` taken by `fragment` and the space after it, when
/// `fragment` opens `sentence` without being all of it.
fn leading_piece(sentence: &str, fragment: &str) -> Option<usize> {
    sentence
        .strip_prefix(fragment)
        .filter(|rest| rest.starts_with(' ') && rest.len() > 1)
        .map(|_| fragment.len() + 1)
}

fn sentence_node(text: &str, piece: Option<Piece>, highlight: Highlight) -> SentenceNode {
    let index = piece.map(|p| p.index);
    let style = match (index, highlight.sentence) {
        (Some(i), Some(active)) if i < active => SentenceStyle::Read,
        (Some(i), Some(active)) if i == active => SentenceStyle::Active,
        _ => SentenceStyle::Unread,
    };

    let words = match piece {
        Some(piece) if style == SentenceStyle::Active => {
            piece_tokens(text, piece.base, highlight.char_offset)
        }
        _ => Vec::new(),
    };

    SentenceNode {
        index,
        text: text.to_string(),
        style,
        words,
    }
}

/// Tokenize `text` into words and whitespace runs, marking the token that
/// contains `char_offset` active.
pub fn word_tokens(text: &str, char_offset: usize) -> Vec<WordToken> {
    piece_tokens(text, 0, char_offset)
}

/// Tokens of a fragment starting `base` bytes into its narrated sentence.
/// Token starts and `char_offset` are both sentence offsets.
fn piece_tokens(text: &str, base: usize, char_offset: usize) -> Vec<WordToken> {
    let local = char_offset.checked_sub(base);
    word_spans(text)
        .into_iter()
        .map(|span| WordToken {
            text: span.slice(text).to_string(),
            start: base + span.start,
            is_whitespace: span.is_whitespace,
            active: local.is_some_and(|offset| span.contains(offset)),
        })
        .collect()
}
