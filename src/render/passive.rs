//! Passive reading layout: article paragraphs plus "Read Also" cards.

use crate::render::article::RelatedArticle;
use crate::render::links::force_new_tab;
use crate::render::tree::RenderNode;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_PARAGRAPH_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p\s*>").unwrap());

/// Split `html` after each closing paragraph tag, keeping the tag.
///
/// Whitespace-only pieces are dropped. Trailing markup after the last
/// paragraph is its own piece.
pub fn split_paragraphs(html: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for close in RE_PARAGRAPH_CLOSE.find_iter(html) {
        push_piece(&mut pieces, &html[start..close.end()]);
        start = close.end();
    }
    push_piece(&mut pieces, &html[start..]);
    pieces
}

fn push_piece<'a>(pieces: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece);
    }
}

/// Lay out paragraphs, injecting the n-th related article's card after the
/// paragraph at position `read_also_after[n]`.
///
/// Cards are never counted as paragraphs.
pub fn render_passive(
    html: &str,
    related: &[RelatedArticle],
    read_also_after: &[usize],
    read_also_path: &str,
) -> Vec<RenderNode> {
    let mut nodes = Vec::new();
    for (position, paragraph) in split_paragraphs(html).into_iter().enumerate() {
        nodes.push(RenderNode::Paragraph {
            html: force_new_tab(paragraph),
        });

        let card = read_also_after
            .iter()
            .position(|&after| after == position)
            .and_then(|slot| related.get(slot))
            .and_then(|article| article.card(read_also_path));
        if let Some(card) = card {
            nodes.push(RenderNode::ReadAlso(card));
        }
    }
    nodes
}
