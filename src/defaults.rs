//! Default configuration constants for readaloud.
//!
//! Shared between the config types, the CLI, and the library entry points so
//! every path agrees on the same values.

use std::time::Duration;

/// Shortest trimmed fragment that still counts as a sentence.
///
/// Shorter fragments are stray punctuation, list bullets, or initials.
pub const MIN_SENTENCE_CHARS: usize = 4;

/// Pause between cancelling and restarting narration on replay.
///
/// Some speech hosts silently drop an utterance queued in the same tick as a
/// cancel. The yield lets the cancellation land first.
pub const REPLAY_YIELD_MS: u64 = 50;

/// Speaking rate assumed by engines that estimate word timing.
pub const WORDS_PER_MINUTE: u32 = 180;

/// Default external synthesizer for the command backend.
pub const SPEECH_COMMAND: &str = "espeak-ng";

/// Zero-based paragraph positions after which a "Read Also" card is injected.
///
/// The first position takes the first related article, the second the second.
pub const READ_ALSO_AFTER: [usize; 2] = [2, 6];

/// URL prefix for "Read Also" links; the article slug is appended.
pub const READ_ALSO_PATH: &str = "/news/";

/// Label shown on injected cards.
pub const READ_ALSO_LABEL: &str = "Read Also";

/// Blocks shown above and below the active block in the terminal viewport.
pub const CONTEXT_BLOCKS: usize = 2;

/// Replay yield as a `Duration`.
pub fn replay_yield() -> Duration {
    Duration::from_millis(REPLAY_YIELD_MS)
}

/// Estimated time to speak one word at `words_per_minute`.
///
/// A rate of zero is treated as one word per minute.
pub fn word_interval(words_per_minute: u32) -> Duration {
    Duration::from_millis(60_000 / u64::from(words_per_minute.max(1)))
}
