//! Render tree produced by one render pass.

use crate::defaults::READ_ALSO_LABEL;
use crate::text::markup::BlockTag;

/// Which of the two mutually exclusive layouts a tree uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Paragraph HTML with "Read Also" cards.
    Passive,
    /// Sentence and word spans with narration highlighting.
    Active,
}

/// A "Read Also" interstitial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadAlsoCard {
    pub title: String,
    pub href: String,
}

/// How a sentence is drawn relative to the narration position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceStyle {
    /// Before the active sentence; drawn muted.
    Read,
    /// Being narrated; highlighted and split into words.
    Active,
    /// Not reached yet.
    Unread,
}

/// One token of the active sentence: a word or a whitespace run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    pub text: String,
    /// Byte offset in the sentence text.
    pub start: usize,
    pub is_whitespace: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceNode {
    /// Global sentence index; `None` if the block pass found no counterpart.
    pub index: Option<usize>,
    pub text: String,
    pub style: SentenceStyle,
    /// Word tokens; filled only for the active sentence.
    pub words: Vec<WordToken>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    /// A paragraph of trusted article markup.
    Paragraph { html: String },
    ReadAlso(ReadAlsoCard),
    /// A paragraph, heading, or list item broken into sentences.
    Block {
        tag: BlockTag,
        sentences: Vec<SentenceNode>,
    },
    /// Unmodified article markup, used when no sentences could be laid out.
    Raw { html: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTree {
    pub mode: RenderMode,
    pub nodes: Vec<RenderNode>,
    /// Sentence index to bring into view after this render.
    pub scroll_target: Option<usize>,
}

impl RenderTree {
    /// Sentence nodes in document order.
    pub fn sentences(&self) -> impl Iterator<Item = &SentenceNode> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                RenderNode::Block { sentences, .. } => Some(sentences.iter()),
                _ => None,
            })
            .flatten()
    }

    /// The highlighted sentence, if this render has one.
    pub fn active_sentence(&self) -> Option<&SentenceNode> {
        self.sentences().find(|s| s.style == SentenceStyle::Active)
    }

    pub fn read_also_cards(&self) -> impl Iterator<Item = &ReadAlsoCard> {
        self.nodes.iter().filter_map(|node| match node {
            RenderNode::ReadAlso(card) => Some(card),
            _ => None,
        })
    }

    /// Serialize to HTML for the surrounding page.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                RenderNode::Paragraph { html } | RenderNode::Raw { html } => out.push_str(html),
                RenderNode::ReadAlso(card) => push_card(&mut out, card),
                RenderNode::Block { tag, sentences } => push_block(&mut out, *tag, sentences),
            }
            out.push('\n');
        }
        out
    }
}

fn push_card(out: &mut String, card: &ReadAlsoCard) {
    out.push_str(&format!(
        "<aside class=\"read-also\"><span class=\"read-also-label\">{}</span> <a href=\"{}\">{}</a></aside>",
        READ_ALSO_LABEL,
        escape_html(&card.href),
        escape_html(&card.title)
    ));
}

fn push_block(out: &mut String, tag: BlockTag, sentences: &[SentenceNode]) {
    let name = tag.name();
    out.push_str(&format!("<{name}>"));
    for (i, sentence) in sentences.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let class = match sentence.style {
            SentenceStyle::Read => "sentence sentence-read",
            SentenceStyle::Active => "sentence sentence-active",
            SentenceStyle::Unread => "sentence",
        };
        match sentence.index {
            Some(index) => out.push_str(&format!(
                "<span class=\"{class}\" data-sentence-index=\"{index}\">"
            )),
            None => out.push_str(&format!("<span class=\"{class}\">")),
        }
        if sentence.words.is_empty() {
            out.push_str(&escape_html(&sentence.text));
        } else {
            for word in &sentence.words {
                let class = if word.active { "word word-active" } else { "word" };
                out.push_str(&format!(
                    "<span class=\"{class}\">{}</span>",
                    escape_html(&word.text)
                ));
            }
        }
        out.push_str("</span>");
    }
    out.push_str(&format!("</{name}>"));
}

/// Escape text for use in HTML content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(index: usize, text: &str, style: SentenceStyle) -> SentenceNode {
        SentenceNode {
            index: Some(index),
            text: text.to_string(),
            style,
            words: Vec::new(),
        }
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn card_html_escapes_title() {
        let tree = RenderTree {
            mode: RenderMode::Passive,
            nodes: vec![RenderNode::ReadAlso(ReadAlsoCard {
                title: "Q&A".to_string(),
                href: "/news/qa".to_string(),
            })],
            scroll_target: None,
        };
        assert_eq!(
            tree.to_html(),
            "<aside class=\"read-also\"><span class=\"read-also-label\">Read Also</span> <a href=\"/news/qa\">Q&amp;A</a></aside>\n"
        );
    }

    #[test]
    fn block_html_marks_styles_and_indices() {
        let tree = RenderTree {
            mode: RenderMode::Active,
            nodes: vec![RenderNode::Block {
                tag: BlockTag::Paragraph,
                sentences: vec![
                    sentence(0, "Done.", SentenceStyle::Read),
                    SentenceNode {
                        words: vec![
                            WordToken {
                                text: "Now".to_string(),
                                start: 0,
                                is_whitespace: false,
                                active: true,
                            },
                            WordToken {
                                text: " ".to_string(),
                                start: 3,
                                is_whitespace: true,
                                active: false,
                            },
                            WordToken {
                                text: "this.".to_string(),
                                start: 4,
                                is_whitespace: false,
                                active: false,
                            },
                        ],
                        ..sentence(1, "Now this.", SentenceStyle::Active)
                    },
                ],
            }],
            scroll_target: Some(1),
        };

        let html = tree.to_html();
        assert!(html.starts_with("<p><span class=\"sentence sentence-read\" data-sentence-index=\"0\">Done.</span> "));
        assert!(html.contains("data-sentence-index=\"1\"><span class=\"word word-active\">Now</span>"));
        assert!(html.ends_with("</span></span></p>\n"));
        assert_eq!(tree.active_sentence().map(|s| s.index), Some(Some(1)));
        assert_eq!(tree.sentences().count(), 2);
    }

    #[test]
    fn raw_and_paragraph_nodes_pass_through() {
        let tree = RenderTree {
            mode: RenderMode::Passive,
            nodes: vec![
                RenderNode::Paragraph {
                    html: "<p><b>x</b></p>".to_string(),
                },
                RenderNode::Raw {
                    html: "<div>y</div>".to_string(),
                },
            ],
            scroll_target: None,
        };
        assert_eq!(tree.to_html(), "<p><b>x</b></p>\n<div>y</div>\n");
        assert_eq!(tree.read_also_cards().count(), 0);
    }
}
