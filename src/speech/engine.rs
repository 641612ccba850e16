use crate::error::{ReadaloudError, Result};
use std::fmt;
use tokio::sync::mpsc;

/// Tag distinguishing one utterance from every utterance before it.
///
/// Issued by the narration controller; strictly increasing for the life of a
/// controller, so a restart at the same sentence still gets a fresh tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The generation after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One request to speak one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub generation: Generation,
    pub text: String,
}

/// Something the speech engine observed while speaking an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEventKind {
    /// Playback reached the word starting at this byte offset of the utterance text.
    WordBoundary { offset: usize },
    /// The utterance finished naturally.
    Completed,
    /// The engine gave up on the utterance.
    Failed { message: String },
}

/// An asynchronous callback from a speech engine, tagged with its utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechEvent {
    pub generation: Generation,
    pub kind: SpeechEventKind,
}

impl SpeechEvent {
    pub fn word_boundary(generation: Generation, offset: usize) -> Self {
        Self {
            generation,
            kind: SpeechEventKind::WordBoundary { offset },
        }
    }

    pub fn completed(generation: Generation) -> Self {
        Self {
            generation,
            kind: SpeechEventKind::Completed,
        }
    }

    pub fn failed(generation: Generation, message: impl Into<String>) -> Self {
        Self {
            generation,
            kind: SpeechEventKind::Failed {
                message: message.into(),
            },
        }
    }
}

/// Channel on which engines deliver their callbacks.
pub type SpeechEventSender = mpsc::UnboundedSender<SpeechEvent>;
pub type SpeechEventReceiver = mpsc::UnboundedReceiver<SpeechEvent>;

/// Create a callback channel for an engine.
pub fn speech_channel() -> (SpeechEventSender, SpeechEventReceiver) {
    mpsc::unbounded_channel()
}

/// Speech synthesis capability.
///
/// `speak` starts an utterance and returns at once; progress arrives later as
/// [`SpeechEvent`]s carrying the utterance's generation. Implementations swap
/// freely (platform TTS, external process, estimated timing, mock).
pub trait SpeechEngine: Send {
    /// Begin speaking. Any utterance still in flight is the caller's to cancel first.
    fn speak(&mut self, utterance: Utterance) -> Result<()>;

    /// Pause the current utterance, if any.
    fn pause(&mut self);

    /// Resume a paused utterance, if any.
    fn resume(&mut self);

    /// Stop the current utterance immediately. Safe to call when idle.
    fn cancel(&mut self);

    /// Name for logging.
    fn name(&self) -> &'static str {
        "speech"
    }
}

impl<T: SpeechEngine + ?Sized> SpeechEngine for Box<T> {
    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        (**self).speak(utterance)
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn resume(&mut self) {
        (**self).resume()
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// A call received by [`MockSpeechEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Speak(Utterance),
    Pause,
    Resume,
    Cancel,
}

/// Mock engine for testing. Records every call and never emits events on its own.
#[derive(Debug, Clone, Default)]
pub struct MockSpeechEngine {
    calls: Vec<EngineCall>,
    should_fail: bool,
}

impl MockSpeechEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to refuse every utterance.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Utterances passed to `speak`, oldest first.
    pub fn spoken(&self) -> Vec<&Utterance> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Speak(utterance) => Some(utterance),
                _ => None,
            })
            .collect()
    }

    /// The most recent utterance, if any.
    pub fn last_spoken(&self) -> Option<&Utterance> {
        self.spoken().last().copied()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl SpeechEngine for MockSpeechEngine {
    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        if self.should_fail {
            return Err(ReadaloudError::SpeechUnavailable {
                engine: "mock".to_string(),
                message: "mock speech failure".to_string(),
            });
        }
        self.calls.push(EngineCall::Speak(utterance));
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(EngineCall::Pause);
    }

    fn resume(&mut self) {
        self.calls.push(EngineCall::Resume);
    }

    fn cancel(&mut self) {
        self.calls.push(EngineCall::Cancel);
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
