//! Markup handling for article bodies.
//!
//! Articles arrive as sanitized HTML. Narration works on plain text, so tags are
//! stripped here. Both the flat and the block-aware sentence passes go through
//! [`strip_markup`], which keeps their text identical.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Any tag or comment.
static RE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->|</?([a-zA-Z][a-zA-Z0-9]*)[^>]*>").unwrap());

static RE_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());

/// Opening tag of a narratable block.
static RE_BLOCK_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(p|h[1-6]|li)(?:\s[^>]*)?>").unwrap());

/// Closing tag of a narratable block.
static RE_BLOCK_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</(p|h[1-6]|li)\s*>").unwrap());

/// Tags that sit inside a run of text and must not split words apart.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "code", "em", "i", "mark", "q", "s", "small", "span", "strong", "sub",
    "sup", "u",
];

/// Strip markup from `html` and return normalized plain text.
///
/// Inline formatting tags vanish; every other tag and comment becomes a space.
/// Entities are decoded after tags are gone, so `&lt;b&gt;` stays literal text.
/// Whitespace runs collapse to one space and the result is trimmed.
pub fn strip_markup(html: &str) -> String {
    let untagged = RE_TAG.replace_all(html, |caps: &Captures| match caps.get(1) {
        Some(name) if is_inline(name.as_str()) => "",
        _ => " ",
    });
    let decoded = decode_entities(&untagged);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_inline(tag: &str) -> bool {
    INLINE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Decode the entities article bodies commonly carry. Unknown entities are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    RE_ENTITY
        .replace_all(text, |caps: &Captures| match decode_entity(&caps[1]) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let value = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(value).filter(|c| *c != '\0');
    }

    let c = match entity.to_ascii_lowercase().as_str() {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" | "lsquo" | "rsquo" => '\'',
        "ldquo" | "rdquo" => '"',
        "laquo" => '«',
        "raquo" => '»',
        "nbsp" => ' ',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "copy" => '©',
        _ => return None,
    };
    Some(c)
}

/// Kind of block that narration mode lays out on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Paragraph,
    Heading(u8),
    ListItem,
}

impl BlockTag {
    fn parse(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "p" => Some(Self::Paragraph),
            "li" => Some(Self::ListItem),
            _ => {
                let level = lower.strip_prefix('h')?.parse::<u8>().ok()?;
                (1..=6).contains(&level).then_some(Self::Heading(level))
            }
        }
    }

    /// HTML element name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paragraph => "p",
            Self::ListItem => "li",
            Self::Heading(1) => "h1",
            Self::Heading(2) => "h2",
            Self::Heading(3) => "h3",
            Self::Heading(4) => "h4",
            Self::Heading(5) => "h5",
            Self::Heading(_) => "h6",
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading(_))
    }

    pub fn is_list_item(&self) -> bool {
        *self == Self::ListItem
    }
}

/// A paragraph, heading, or list item found in an article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    pub tag: BlockTag,
    /// Markup between the opening and closing tags.
    pub inner: &'a str,
}

impl Block<'_> {
    /// Plain text of the block, normalized the same way as the flat pass.
    pub fn text(&self) -> String {
        strip_markup(self.inner)
    }
}

/// Scan `html` for narratable blocks in document order.
///
/// Scanning resumes after each block's closing tag, so a paragraph nested in a
/// list item is part of that item rather than a block of its own. A block with
/// no closing tag ends where the next block opens.
pub fn blocks(html: &str) -> Vec<Block<'_>> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(open) = RE_BLOCK_OPEN.captures_at(html, pos) {
        let (Some(whole), Some(name)) = (open.get(0), open.get(1)) else {
            break;
        };
        let Some(tag) = BlockTag::parse(name.as_str()) else {
            pos = whole.end();
            continue;
        };

        let body_start = whole.end();
        let next_open = RE_BLOCK_OPEN
            .find_at(html, body_start)
            .map_or(html.len(), |m| m.start());
        let close = RE_BLOCK_CLOSE
            .captures_iter(&html[body_start..])
            .filter_map(|c| {
                let m = c.get(0)?;
                let closing = BlockTag::parse(c.get(1)?.as_str())?;
                (closing == tag).then_some((body_start + m.start(), body_start + m.end()))
            })
            .next();

        // Paragraphs cannot contain blocks; list items and headings may wrap them.
        let (body_end, resume) = match close {
            Some((start, end)) if tag != BlockTag::Paragraph || start <= next_open => (start, end),
            _ => (next_open, next_open),
        };

        found.push(Block {
            tag,
            inner: &html[body_start..body_end],
        });
        if resume <= pos {
            break;
        }
        pos = resume;
    }

    found
}
