//! Sentence-by-sentence narration state machine.
//!
//! ```text
//! Idle --start--> Playing --toggle--> Paused --toggle--> Playing
//! Playing --utterance completes--> Playing (next) | Idle (after last)
//! Playing/Paused --stop--> Idle
//! any --replay--> Playing (sentence 0)
//! ```
//!
//! Control calls mutate state immediately. Engine callbacks arrive later and
//! are accepted only when they carry the generation of the utterance in flight;
//! anything else belongs to a cancelled utterance and is dropped.

use crate::defaults;
use crate::narration::events::NarrationEvent;
use crate::narration::state::{PlaybackState, PlaybackStatus};
use crate::speech::engine::{Generation, SpeechEngine, SpeechEvent, SpeechEventKind, Utterance};
use crate::text::segmenter::Sentence;
use crate::text::words::clamp_offset;
use std::time::Duration;

pub struct NarrationController<E: SpeechEngine> {
    engine: E,
    sentences: Vec<Sentence>,
    state: PlaybackState,
    /// Last generation handed to the engine.
    issued: Generation,
    /// Generation whose callbacks are still wanted.
    in_flight: Option<Generation>,
    /// The utterance ended while paused; advance on resume.
    completed_while_paused: bool,
    replay_yield: Duration,
    event_tx: Option<crossbeam_channel::Sender<NarrationEvent>>,
}

impl<E: SpeechEngine> NarrationController<E> {
    pub fn new(engine: E, sentences: Vec<Sentence>) -> Self {
        Self {
            engine,
            sentences,
            state: PlaybackState::idle(),
            issued: Generation::default(),
            in_flight: None,
            completed_while_paused: false,
            replay_yield: defaults::replay_yield(),
            event_tx: None,
        }
    }

    /// Set the pause between cancel and restart in [`replay`](Self::replay).
    pub fn with_replay_yield(mut self, replay_yield: Duration) -> Self {
        self.replay_yield = replay_yield;
        self
    }

    /// Publish [`NarrationEvent`]s on `tx`.
    pub fn with_event_sender(mut self, tx: crossbeam_channel::Sender<NarrationEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// The sentence being narrated, if any.
    pub fn current_sentence(&self) -> Option<&Sentence> {
        self.state.sentence_index.and_then(|i| self.sentences.get(i))
    }

    /// Generation of the utterance whose callbacks are accepted.
    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Replace the sentence list for a new article. Ends any session first.
    pub fn set_sentences(&mut self, sentences: Vec<Sentence>) {
        self.stop();
        self.sentences = sentences;
    }

    /// Start narrating from the first sentence, superseding any session.
    ///
    /// With no sentences this ends immediately with `Completed`.
    pub fn start(&mut self) {
        if self.sentences.is_empty() {
            tracing::debug!("nothing to narrate");
            self.stop();
            self.emit(NarrationEvent::Completed);
            return;
        }

        self.engine.cancel();
        self.in_flight = None;
        self.completed_while_paused = false;
        let previous = self.state;
        self.transition(PlaybackStatus::Playing, Some(0), 0);
        // Publish the full (0, 0) highlight before audio, whatever was unchanged.
        if previous.sentence_index == Some(0) {
            self.emit(NarrationEvent::Sentence(Some(0)));
        }
        if previous.char_offset == 0 {
            self.emit(NarrationEvent::CharOffset(0));
        }
        self.speak_current();
    }

    /// Pause when playing, resume when paused. Does nothing when idle.
    pub fn toggle_pause_resume(&mut self) {
        let PlaybackState {
            status,
            sentence_index,
            char_offset,
        } = self.state;

        match status {
            PlaybackStatus::Idle => {
                tracing::debug!("toggle ignored while idle");
            }
            PlaybackStatus::Playing => {
                self.engine.pause();
                self.transition(PlaybackStatus::Paused, sentence_index, char_offset);
            }
            PlaybackStatus::Paused => {
                self.engine.resume();
                self.transition(PlaybackStatus::Playing, sentence_index, char_offset);
                if self.completed_while_paused {
                    self.completed_while_paused = false;
                    self.advance();
                }
            }
        }
    }

    /// Cancel speech and return to idle. Safe at any time.
    pub fn stop(&mut self) {
        self.engine.cancel();
        self.in_flight = None;
        self.completed_while_paused = false;
        self.transition(PlaybackStatus::Idle, None, 0);
    }

    /// Stop, let the engine observe the cancellation, then start from the top.
    ///
    /// Some hosts drop an utterance queued in the same tick as a cancel, hence
    /// the yield.
    pub async fn replay(&mut self) {
        self.stop();
        if self.replay_yield.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.replay_yield).await;
        }
        self.start();
    }

    /// Apply a callback from the engine. Returns false if it was stale.
    pub fn handle_speech_event(&mut self, event: SpeechEvent) -> bool {
        if self.in_flight != Some(event.generation) {
            tracing::debug!(
                generation = %event.generation,
                in_flight = ?self.in_flight.map(|g| g.value()),
                "discarding stale speech event"
            );
            return false;
        }

        match event.kind {
            SpeechEventKind::WordBoundary { offset } => {
                let Some(sentence) = self.current_sentence() else {
                    return false;
                };
                let offset = clamp_offset(&sentence.text, offset);
                let PlaybackState {
                    status,
                    sentence_index,
                    ..
                } = self.state;
                self.transition(status, sentence_index, offset);
            }
            SpeechEventKind::Completed => {
                self.in_flight = None;
                if self.state.status == PlaybackStatus::Paused {
                    self.completed_while_paused = true;
                } else {
                    self.advance();
                }
            }
            SpeechEventKind::Failed { message } => self.fail(message),
        }
        true
    }

    fn advance(&mut self) {
        let next = self.state.sentence_index.map_or(0, |i| i + 1);
        if next < self.sentences.len() {
            self.transition(PlaybackStatus::Playing, Some(next), 0);
            self.speak_current();
        } else {
            tracing::debug!(sentences = self.sentences.len(), "narration finished");
            self.stop();
            self.emit(NarrationEvent::Completed);
        }
    }

    fn speak_current(&mut self) {
        let Some(text) = self.current_sentence().map(|s| s.text.clone()) else {
            return;
        };
        let generation = self.issued.next();
        self.issued = generation;
        self.in_flight = Some(generation);

        if let Err(e) = self.engine.speak(Utterance { generation, text }) {
            self.fail(e.to_string());
        }
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(engine = self.engine.name(), "speech failed: {message}");
        self.stop();
        self.emit(NarrationEvent::Failed { message });
    }

    fn transition(&mut self, status: PlaybackStatus, sentence_index: Option<usize>, char_offset: usize) {
        debug_assert_eq!(status == PlaybackStatus::Idle, sentence_index.is_none());
        debug_assert!(sentence_index.is_none_or(|i| i < self.sentences.len()));

        let previous = self.state;
        self.state = PlaybackState {
            status,
            sentence_index,
            char_offset,
        };

        if previous.status != status {
            tracing::debug!(from = ?previous.status, to = ?status, "playback status");
            self.emit(NarrationEvent::Status(status));
        }
        if previous.sentence_index != sentence_index {
            self.emit(NarrationEvent::Sentence(sentence_index));
        }
        if previous.char_offset != char_offset {
            self.emit(NarrationEvent::CharOffset(char_offset));
        }
    }

    fn emit(&self, event: NarrationEvent) {
        if let Some(ref tx) = self.event_tx
            && tx.try_send(event).is_err()
        {
            tracing::debug!("narration event dropped: receiver gone or full");
        }
    }
}
