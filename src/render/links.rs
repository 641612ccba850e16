//! Anchor rewriting for article markup.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_ANCHOR_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<a\b([^>]*)>").unwrap());

static RE_TARGET_OR_REL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+(?:target|rel)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).unwrap()
});

/// Make every anchor in `html` open in a new tab without opener or referrer.
///
/// Existing `target` and `rel` attributes are replaced.
pub fn force_new_tab(html: &str) -> String {
    RE_ANCHOR_OPEN
        .replace_all(html, |caps: &Captures| {
            let attrs = RE_TARGET_OR_REL.replace_all(&caps[1], "");
            let attrs = attrs.trim_end();
            format!("<a{attrs} target=\"_blank\" rel=\"noopener noreferrer\">")
        })
        .into_owned()
}
