//! readaloud - Synchronized read-aloud narration for news articles
//!
//! Segments an article into sentences, narrates them one at a time through a
//! pluggable speech engine, and renders the article with the spoken sentence
//! and word highlighted.

// Enforce error handling discipline: propagate, don't panic
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod narration;
pub mod output;
pub mod render;
pub mod session;
pub mod speech;
pub mod sys;
pub mod text;

// Core seams (text -> narration -> render)
pub use narration::{Highlight, NarrationController, NarrationEvent, PlaybackState, PlaybackStatus};
pub use render::{Article, RelatedArticle, RenderTree, SynchronizedRenderer};
pub use speech::{SpeechEngine, SpeechEvent, Utterance};
pub use text::{Sentence, segment};

// Error handling
pub use error::{ReadaloudError, Result};

// Config
pub use config::Config;

/// Package version with the short commit hash appended when the build ran
/// inside a git checkout, e.g. `0.1.0+1a2b3c4`. Plain `0.1.0` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    option_env!("GIT_HASH")
        .filter(|hash| !hash.is_empty())
        .map_or_else(|| version.to_string(), |hash| format!("{version}+{hash}"))
}
