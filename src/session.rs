//! Interactive narration loop.
//!
//! One task owns the controller, the renderer, and the terminal. Speech
//! callbacks, user commands, and Ctrl-C are multiplexed with `select!`, so
//! every state change is applied in arrival order and followed by a redraw.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::narration::{NarrationController, NarrationEvent};
use crate::output;
use crate::render::{Article, RelatedArticle, RenderTree, ScrollScheduler, SynchronizedRenderer};
use crate::speech::{SpeechEngine, SpeechEventReceiver};
use crossbeam_channel::Receiver;
use std::io::BufRead;
use std::time::Duration;
use tokio::sync::mpsc;

/// Input lines for [`Session::run`]. The session sees end of input when every
/// sender is gone.
pub type InputLines = mpsc::UnboundedReceiver<String>;

/// Read stdin lines on a dedicated thread.
///
/// A blocking stdin read inside the runtime would hold up shutdown until the
/// user pressed enter; a detached thread does not.
pub fn spawn_stdin_reader() -> InputLines {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Input that yields `lines` and then ends.
pub fn scripted_input<I, S>(lines: I) -> InputLines
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let (tx, rx) = mpsc::unbounded_channel();
    for line in lines {
        tx.send(line.into()).ok();
    }
    rx
}

/// A user command read from the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Play,
    TogglePause,
    Stop,
    Replay,
    Quit,
}

impl UserCommand {
    /// Parse one input line. A line of only spaces toggles pause.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.is_empty() && line.trim().is_empty() {
            return Some(Self::TogglePause);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "g" | "go" | "play" => Some(Self::Play),
            "p" | "pause" | "resume" => Some(Self::TogglePause),
            "s" | "stop" => Some(Self::Stop),
            "r" | "replay" => Some(Self::Replay),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The last sentence was narrated.
    Completed,
    /// The speech engine failed.
    Failed(String),
    /// The user quit.
    Quit,
    /// Input closed with nothing left playing.
    InputClosed,
    /// Ctrl-C.
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub format: OutputFormat,
    pub context_blocks: usize,
    /// Start narrating as soon as the loop runs.
    pub autostart: bool,
    /// Keep running after narration completes or fails.
    pub stay: bool,
    /// Draw to the terminal. Off for embedding and tests.
    pub draw: bool,
    pub replay_yield: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Ansi,
            context_blocks: crate::defaults::CONTEXT_BLOCKS,
            autostart: true,
            stay: false,
            draw: true,
            replay_yield: crate::defaults::replay_yield(),
        }
    }
}

pub struct Session<E: SpeechEngine> {
    controller: NarrationController<E>,
    speech_rx: SpeechEventReceiver,
    narration_rx: Receiver<NarrationEvent>,
    article: Article,
    related: Vec<RelatedArticle>,
    renderer: SynchronizedRenderer,
    scroll: ScrollScheduler,
    options: SessionOptions,
    history: Vec<NarrationEvent>,
}

impl<E: SpeechEngine> Session<E> {
    /// `speech_rx` must be the receiving end of the channel `engine` reports on.
    pub fn new(
        engine: E,
        speech_rx: SpeechEventReceiver,
        article: Article,
        related: Vec<RelatedArticle>,
        renderer: SynchronizedRenderer,
        options: SessionOptions,
    ) -> Self {
        let (event_tx, narration_rx) = crossbeam_channel::unbounded();
        let controller = NarrationController::new(engine, article.sentences().to_vec())
            .with_replay_yield(options.replay_yield)
            .with_event_sender(event_tx);

        Self {
            controller,
            speech_rx,
            narration_rx,
            article,
            related,
            renderer,
            scroll: ScrollScheduler::new(),
            options,
            history: Vec::new(),
        }
    }

    pub fn controller(&self) -> &NarrationController<E> {
        &self.controller
    }

    pub fn scroll(&self) -> &ScrollScheduler {
        &self.scroll
    }

    /// Every narration event published so far, in order.
    pub fn history(&self) -> &[NarrationEvent] {
        &self.history
    }

    /// Render the article for the current playback position.
    pub fn render(&self) -> RenderTree {
        self.renderer.render(
            &self.article,
            self.controller.state().highlight(),
            &self.related,
        )
    }

    /// Apply a user command other than quit.
    pub async fn apply(&mut self, command: UserCommand) {
        tracing::debug!(?command, "user command");
        match command {
            UserCommand::Play => self.controller.start(),
            UserCommand::TogglePause => self.controller.toggle_pause_resume(),
            UserCommand::Stop => self.controller.stop(),
            UserCommand::Replay => self.controller.replay().await,
            UserCommand::Quit => self.controller.stop(),
        }
    }

    /// Run until quit, input exhaustion, Ctrl-C, or narration end.
    pub async fn run(self, input: InputLines) -> Result<(SessionOutcome, Vec<NarrationEvent>)> {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("cannot listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        };
        self.run_until(input, ctrl_c).await
    }

    /// Like [`Session::run`], ending with `Interrupted` once `interrupt`
    /// resolves. The future lives across loop iterations, so an interrupt
    /// that lands while a command is being applied is still seen.
    pub async fn run_until<F>(
        mut self,
        input: InputLines,
        interrupt: F,
    ) -> Result<(SessionOutcome, Vec<NarrationEvent>)>
    where
        F: Future<Output = ()>,
    {
        let outcome = self.run_loop(input, interrupt).await;
        self.controller.stop();
        self.drain_events();
        if self.options.draw {
            output::clear_line();
        }
        Ok((outcome?, self.history))
    }

    async fn run_loop<F>(&mut self, mut input: InputLines, interrupt: F) -> Result<SessionOutcome>
    where
        F: Future<Output = ()>,
    {
        let mut input_open = true;
        tokio::pin!(interrupt);

        if self.options.autostart {
            self.controller.start();
        }

        loop {
            if let Some(outcome) = self.drain_events()
                && !self.options.stay
            {
                self.refresh()?;
                return Ok(outcome);
            }
            self.refresh()?;

            if !input_open && self.controller.state().is_idle() {
                return Ok(SessionOutcome::InputClosed);
            }

            tokio::select! {
                Some(event) = self.speech_rx.recv() => {
                    self.controller.handle_speech_event(event);
                }
                line = input.recv(), if input_open => match line {
                    Some(line) => match UserCommand::parse(&line) {
                        Some(UserCommand::Quit) => return Ok(SessionOutcome::Quit),
                        Some(command) => self.apply(command).await,
                        None if line.trim().is_empty() => {}
                        None => tracing::warn!(input = %line.trim(), "unknown command"),
                    },
                    None => {
                        tracing::debug!("input closed");
                        input_open = false;
                    }
                },
                () = &mut interrupt => return Ok(SessionOutcome::Interrupted),
            }
        }
    }

    /// Collect published events; returns the outcome if narration ended.
    fn drain_events(&mut self) -> Option<SessionOutcome> {
        let mut outcome = None;
        while let Ok(event) = self.narration_rx.try_recv() {
            if event.is_terminal() {
                if self.options.draw {
                    output::render_event(&event);
                }
                outcome = Some(match &event {
                    NarrationEvent::Failed { message } => SessionOutcome::Failed(message.clone()),
                    _ => SessionOutcome::Completed,
                });
            }
            self.history.push(event);
        }
        outcome
    }

    fn refresh(&mut self) -> Result<()> {
        let tree = self.render();
        if self.scroll.schedule(&tree)
            && let Some(request) = self.scroll.latest()
        {
            tracing::trace!(sentence = request.sentence, "scroll");
        }
        if self.options.draw {
            output::clear_screen();
            output::print_tree(&tree, self.options.format, self.options.context_blocks)?;
            output::render_status(&self.controller.state(), self.article.sentences().len());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::PlaybackStatus;
    use crate::speech::{EngineCall, MockSpeechEngine, speech_channel};

    fn quiet() -> SessionOptions {
        SessionOptions {
            draw: false,
            replay_yield: Duration::ZERO,
            ..SessionOptions::default()
        }
    }

    fn session(options: SessionOptions) -> Session<MockSpeechEngine> {
        let (_tx, rx) = speech_channel();
        Session::new(
            MockSpeechEngine::new(),
            rx,
            Article::new("<p>First one here. Second one here.</p>"),
            Vec::new(),
            SynchronizedRenderer::default(),
            options,
        )
    }

    #[test]
    fn parse_commands() {
        assert_eq!(UserCommand::parse("g"), Some(UserCommand::Play));
        assert_eq!(UserCommand::parse("P\r\n"), Some(UserCommand::TogglePause));
        assert_eq!(UserCommand::parse(" "), Some(UserCommand::TogglePause));
        assert_eq!(UserCommand::parse("stop"), Some(UserCommand::Stop));
        assert_eq!(UserCommand::parse(" r "), Some(UserCommand::Replay));
        assert_eq!(UserCommand::parse("q"), Some(UserCommand::Quit));
        assert_eq!(UserCommand::parse(""), None);
        assert_eq!(UserCommand::parse("x"), None);
    }

    #[tokio::test]
    async fn commands_drive_the_controller() {
        let mut session = session(quiet());
        session.apply(UserCommand::Play).await;
        assert_eq!(session.controller().state().status, PlaybackStatus::Playing);
        session.apply(UserCommand::TogglePause).await;
        assert_eq!(session.controller().state().status, PlaybackStatus::Paused);
        session.apply(UserCommand::Stop).await;
        assert!(session.controller().state().is_idle());
        assert_eq!(
            session.controller().engine().calls().last(),
            Some(&EngineCall::Cancel)
        );
    }

    #[tokio::test]
    async fn render_follows_playback() {
        let mut session = session(quiet());
        assert!(session.render().active_sentence().is_none());
        session.apply(UserCommand::Play).await;
        let tree = session.render();
        assert_eq!(tree.scroll_target, Some(0));
        assert_eq!(tree.active_sentence().map(|s| s.text.as_str()), Some("First one here."));
    }

    #[tokio::test]
    async fn quit_ends_the_loop() {
        let session = session(quiet());
        let (outcome, history) = session.run(scripted_input(["q"])).await.unwrap();
        assert_eq!(outcome, SessionOutcome::Quit);
        assert!(history.contains(&NarrationEvent::Status(PlaybackStatus::Playing)));
        assert!(history.contains(&NarrationEvent::Status(PlaybackStatus::Idle)));
        assert_eq!(history.last(), Some(&NarrationEvent::Sentence(None)));
    }

    #[tokio::test]
    async fn closed_input_while_idle_ends_the_loop() {
        let session = session(SessionOptions {
            autostart: false,
            ..quiet()
        });
        let (outcome, history) = session.run(scripted_input(Vec::<String>::new())).await.unwrap();
        assert_eq!(outcome, SessionOutcome::InputClosed);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn stop_then_closed_input_ends_the_loop() {
        let session = session(quiet());
        let (outcome, _) = session.run(scripted_input(["bogus", "s"])).await.unwrap();
        assert_eq!(outcome, SessionOutcome::InputClosed);
    }

    #[tokio::test]
    async fn interrupt_during_replay_is_not_lost() {
        let session = session(SessionOptions {
            replay_yield: Duration::from_millis(200),
            ..quiet()
        });
        // Fires while the replay yield is still sleeping.
        let interrupt = tokio::time::sleep(Duration::from_millis(20));
        let (outcome, history) = tokio::time::timeout(
            Duration::from_secs(5),
            session.run_until(scripted_input(["r"]), interrupt),
        )
        .await
        .expect("interrupt should end the session")
        .unwrap();

        assert_eq!(outcome, SessionOutcome::Interrupted);
        let starts = history
            .iter()
            .filter(|e| **e == NarrationEvent::Sentence(Some(0)))
            .count();
        assert_eq!(starts, 2, "replay finished before the interrupt was handled");
    }
}
