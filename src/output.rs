//! Terminal presentation of render trees and narration status.
//! Used by both `readaloud render` and the interactive `readaloud read` loop.

use crate::config::OutputFormat;
use crate::defaults::READ_ALSO_LABEL;
use crate::narration::{NarrationEvent, PlaybackState, PlaybackStatus};
use crate::render::tree::{RenderMode, RenderNode, RenderTree, SentenceNode, SentenceStyle};
use crate::text::markup::strip_markup;
use std::io::{self, Write};

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const UNDERLINE: &str = "\x1b[4m";
const INVERSE: &str = "\x1b[7m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Clear the current terminal line (replaces the status line)
pub fn clear_line() {
    eprint!("\r\x1b[2K");
}

/// Clear the screen and move the cursor home before a redraw.
pub fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

/// Format a render tree for the terminal or as HTML.
pub fn format_tree(tree: &RenderTree, format: OutputFormat, context_blocks: usize) -> String {
    match format {
        OutputFormat::Html => tree.to_html(),
        OutputFormat::Ansi => format_tree_ansi(tree, context_blocks),
    }
}

/// Write a formatted tree to stdout.
pub fn print_tree(tree: &RenderTree, format: OutputFormat, context_blocks: usize) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(format_tree(tree, format, context_blocks).as_bytes())?;
    stdout.flush()
}

/// ANSI rendering. Active trees show only the blocks around the scroll
/// target, `context_blocks` on each side.
pub fn format_tree_ansi(tree: &RenderTree, context_blocks: usize) -> String {
    let (first, last) = match tree.mode {
        RenderMode::Passive => (0, tree.nodes.len()),
        RenderMode::Active => viewport(tree, context_blocks),
    };

    let mut out = String::new();
    if first > 0 {
        out.push_str(&format!("{DIM}  ... {first} blocks above{RESET}\n\n"));
    }
    for node in &tree.nodes[first..last] {
        format_node(&mut out, node);
        out.push_str("\n\n");
    }
    let below = tree.nodes.len() - last;
    if below > 0 {
        out.push_str(&format!("{DIM}  ... {below} blocks below{RESET}\n"));
    }
    out
}

/// Node range `[first, last)` centred on the block holding the scroll target.
fn viewport(tree: &RenderTree, context_blocks: usize) -> (usize, usize) {
    let center = tree
        .scroll_target
        .and_then(|target| {
            tree.nodes.iter().position(|node| match node {
                RenderNode::Block { sentences, .. } => {
                    sentences.iter().any(|s| s.index == Some(target))
                }
                _ => false,
            })
        })
        .unwrap_or(0);

    let first = center.saturating_sub(context_blocks);
    let last = (center + context_blocks + 1).min(tree.nodes.len());
    (first, last)
}

fn format_node(out: &mut String, node: &RenderNode) {
    match node {
        RenderNode::Paragraph { html } | RenderNode::Raw { html } => {
            out.push_str(&strip_markup(html));
        }
        RenderNode::ReadAlso(card) => {
            out.push_str(&format!(
                "  {DIM}{READ_ALSO_LABEL}:{RESET} {BOLD}{}{RESET} {DIM}({}){RESET}",
                card.title, card.href
            ));
        }
        RenderNode::Block { tag, sentences } => {
            if tag.is_heading() {
                out.push_str(BOLD);
            } else if tag.is_list_item() {
                out.push_str("  - ");
            }
            for (i, sentence) in sentences.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                format_sentence(out, sentence);
            }
            if tag.is_heading() {
                out.push_str(RESET);
            }
        }
    }
}

fn format_sentence(out: &mut String, sentence: &SentenceNode) {
    match sentence.style {
        SentenceStyle::Read => out.push_str(&format!("{DIM}{}{RESET}", sentence.text)),
        SentenceStyle::Unread => out.push_str(&sentence.text),
        SentenceStyle::Active if sentence.words.is_empty() => {
            out.push_str(&format!("{INVERSE}{}{RESET}", sentence.text));
        }
        SentenceStyle::Active => {
            for word in &sentence.words {
                if word.active && !word.is_whitespace {
                    out.push_str(&format!("{INVERSE}{BOLD}{UNDERLINE}{}{RESET}", word.text));
                } else {
                    out.push_str(&format!("{INVERSE}{}{RESET}", word.text));
                }
            }
        }
    }
}

/// One-line narration status, e.g. `> playing 3/12`.
pub fn format_status(state: &PlaybackState, total: usize) -> String {
    let position = state
        .sentence_index
        .map(|i| format!(" {}/{total}", i + 1))
        .unwrap_or_default();
    match state.status {
        PlaybackStatus::Idle => format!("{DIM}[] idle{RESET}"),
        PlaybackStatus::Playing => format!("{GREEN}> playing{position}{RESET}"),
        PlaybackStatus::Paused => format!("{YELLOW}|| paused{position}{RESET}"),
    }
}

/// Print the status line and the command hint to stderr.
pub fn render_status(state: &PlaybackState, total: usize) {
    clear_line();
    eprint!(
        "{}  {DIM}[g]o [p]ause [s]top [r]eplay [q]uit{RESET}",
        format_status(state, total)
    );
    io::stderr().flush().ok();
}

/// Report a terminal narration event on stderr.
pub fn render_event(event: &NarrationEvent) {
    match event {
        NarrationEvent::Completed => {
            clear_line();
            eprintln!("{GREEN}Narration finished{RESET}");
        }
        NarrationEvent::Failed { message } => {
            clear_line();
            eprintln!("{RED}Narration failed: {message}{RESET}");
        }
        _ => {}
    }
}
