//! Estimated word timing shared by engines without native boundary events.
//!
//! Boundaries are reported at the start of every word, one word interval
//! apart. This approximates where playback is; it is not phoneme-accurate.

use crate::error::{ReadaloudError, Result};
use crate::speech::engine::{Generation, SpeechEvent, SpeechEventSender};
use crate::text::words::word_starts;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A background task driving one utterance, with a pause switch.
///
/// Dropping it aborts the task.
pub(crate) struct PacedTask {
    tasks: Vec<JoinHandle<()>>,
    paused: watch::Sender<bool>,
}

impl PacedTask {
    pub(crate) fn pause(&self) {
        self.paused.send_replace(true);
    }

    pub(crate) fn resume(&self) {
        self.paused.send_replace(false);
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.tasks.iter().all(|t| t.is_finished())
    }

    /// Attach another task that lives and dies with this utterance.
    pub(crate) fn attach(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    pub(crate) fn pause_receiver(&self) -> watch::Receiver<bool> {
        self.paused.subscribe()
    }
}

impl Drop for PacedTask {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Spawn a pacer reporting word boundaries for `text`.
///
/// With `complete_at_end`, a `Completed` event follows the last word once its
/// interval has elapsed.
pub(crate) fn spawn_pacer(
    engine: &'static str,
    text: &str,
    generation: Generation,
    interval: Duration,
    complete_at_end: bool,
    events: SpeechEventSender,
) -> Result<PacedTask> {
    let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
        ReadaloudError::SpeechUnavailable {
            engine: engine.to_string(),
            message: e.to_string(),
        }
    })?;

    let (paused_tx, paused_rx) = watch::channel(false);
    let starts = word_starts(text);
    let task = runtime.spawn(async move {
        let mut paused = paused_rx;
        for offset in starts {
            wait_while_paused(&mut paused).await;
            if events
                .send(SpeechEvent::word_boundary(generation, offset))
                .is_err()
            {
                return;
            }
            tokio::time::sleep(interval).await;
        }
        wait_while_paused(&mut paused).await;
        if complete_at_end {
            // Receiver gone means nobody is listening any more.
            events.send(SpeechEvent::completed(generation)).ok();
        }
    });

    Ok(PacedTask {
        tasks: vec![task],
        paused: paused_tx,
    })
}

/// Return once the pause switch is off or its sender is gone.
pub(crate) async fn wait_while_paused(paused: &mut watch::Receiver<bool>) {
    while *paused.borrow_and_update() {
        if paused.changed().await.is_err() {
            return;
        }
    }
}
