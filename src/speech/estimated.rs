//! Silent engine that reports estimated word timing.
//!
//! Stands in for a host without a boundary-capable speech API: it produces no
//! audio, but walks each utterance at a fixed words-per-minute rate and emits
//! boundary and completion events as a real engine would. The timing is an
//! estimate, so highlighting is reduced-fidelity with this backend.

use crate::defaults;
use crate::error::Result;
use crate::speech::engine::{SpeechEngine, SpeechEventSender, Utterance};
use crate::speech::pacing::{PacedTask, spawn_pacer};
use std::time::Duration;

pub struct EstimatedSpeechEngine {
    events: SpeechEventSender,
    interval: Duration,
    current: Option<PacedTask>,
}

impl EstimatedSpeechEngine {
    pub fn new(events: SpeechEventSender, words_per_minute: u32) -> Self {
        Self {
            events,
            interval: defaults::word_interval(words_per_minute),
            current: None,
        }
    }

    /// Override the per-word interval directly.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether an utterance is still being walked.
    pub fn is_speaking(&self) -> bool {
        self.current.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl SpeechEngine for EstimatedSpeechEngine {
    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        self.cancel();
        let task = spawn_pacer(
            self.name(),
            &utterance.text,
            utterance.generation,
            self.interval,
            true,
            self.events.clone(),
        )?;
        self.current = Some(task);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(task) = &self.current {
            task.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(task) = &self.current {
            task.resume();
        }
    }

    fn cancel(&mut self) {
        self.current = None;
    }

    fn name(&self) -> &'static str {
        "estimated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::engine::{Generation, SpeechEventKind, speech_channel};

    #[tokio::test]
    async fn speaks_and_completes() {
        let (tx, mut rx) = speech_channel();
        let mut engine =
            EstimatedSpeechEngine::new(tx, 180).with_interval(Duration::from_millis(1));
        engine
            .speak(Utterance {
                generation: Generation::new(2),
                text: "Quick test.".to_string(),
            })
            .unwrap();
        assert!(engine.is_speaking());

        let mut last = None;
        while let Some(event) = rx.recv().await {
            assert_eq!(event.generation, Generation::new(2));
            if event.kind == SpeechEventKind::Completed {
                last = Some(event.kind);
                break;
            }
        }
        assert_eq!(last, Some(SpeechEventKind::Completed));
    }

    #[tokio::test]
    async fn new_utterance_supersedes_old() {
        let (tx, mut rx) = speech_channel();
        let mut engine =
            EstimatedSpeechEngine::new(tx, 180).with_interval(Duration::from_millis(5));
        engine
            .speak(Utterance {
                generation: Generation::new(1),
                text: "Old words that never finish.".to_string(),
            })
            .unwrap();
        engine
            .speak(Utterance {
                generation: Generation::new(2),
                text: "New.".to_string(),
            })
            .unwrap();

        while let Some(event) = rx.recv().await {
            if event.kind == SpeechEventKind::Completed {
                assert_eq!(event.generation, Generation::new(2));
                break;
            }
        }
    }

    #[tokio::test]
    async fn cancel_when_idle_is_harmless() {
        let (tx, _rx) = speech_channel();
        let mut engine = EstimatedSpeechEngine::new(tx, 180);
        engine.cancel();
        engine.pause();
        engine.resume();
        assert!(!engine.is_speaking());
    }
}
