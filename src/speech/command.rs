//! External synthesizer process as a speech engine.
//!
//! Each utterance runs the configured program (e.g. `espeak-ng`) with the
//! sentence as its last argument. Completion is the process exiting; word
//! boundaries are estimated at a fixed rate because command-line synthesizers
//! do not report them. Pause and resume stop and continue the process.

use crate::defaults;
use crate::error::{ReadaloudError, Result};
use crate::speech::engine::{SpeechEngine, SpeechEvent, SpeechEventSender, Utterance};
use crate::speech::pacing::{PacedTask, spawn_pacer, wait_while_paused};
use crate::sys;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

pub struct CommandSpeechEngine {
    program: String,
    args: Vec<String>,
    events: SpeechEventSender,
    interval: Duration,
    current: Option<RunningUtterance>,
}

struct RunningUtterance {
    task: PacedTask,
    pid: Option<u32>,
}

impl CommandSpeechEngine {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        events: SpeechEventSender,
        words_per_minute: u32,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            events,
            interval: defaults::word_interval(words_per_minute),
            current: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn spawn_error(&self, e: std::io::Error) -> ReadaloudError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReadaloudError::SpeechToolNotFound {
                tool: self.program.clone(),
            }
        } else {
            ReadaloudError::SpeechFailed {
                message: format!("Failed to execute {}: {}", self.program, e),
            }
        }
    }
}

impl SpeechEngine for CommandSpeechEngine {
    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        self.cancel();

        // Checks for a runtime before a process is spawned.
        let mut task = spawn_pacer(
            self.name(),
            &utterance.text,
            utterance.generation,
            self.interval,
            false,
            self.events.clone(),
        )?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;
        let pid = child.id();

        let events = self.events.clone();
        let program = self.program.clone();
        let generation = utterance.generation;
        let mut paused = task.pause_receiver();
        task.attach(tokio::spawn(async move {
            let event = match child.wait().await {
                Ok(status) if status.success() => SpeechEvent::completed(generation),
                Ok(status) => SpeechEvent::failed(generation, format!("{program} exited with {status}")),
                Err(e) => SpeechEvent::failed(generation, format!("{program}: {e}")),
            };
            // A stopped process cannot exit, but hold the event anyway if the
            // pause landed between exit and here.
            wait_while_paused(&mut paused).await;
            events.send(event).ok();
        }));

        self.current = Some(RunningUtterance { task, pid });
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(running) = &self.current {
            if let Some(pid) = running.pid
                && !sys::suspend_process(pid)
            {
                tracing::debug!(pid, "could not suspend synthesizer");
            }
            running.task.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(running) = &self.current {
            if let Some(pid) = running.pid
                && !sys::continue_process(pid)
            {
                tracing::debug!(pid, "could not continue synthesizer");
            }
            running.task.resume();
        }
    }

    fn cancel(&mut self) {
        if let Some(running) = self.current.take()
            && let Some(pid) = running.pid
        {
            // A stopped process must be continued before the kill can land.
            sys::continue_process(pid);
        }
    }

    fn name(&self) -> &'static str {
        "command"
    }
}
