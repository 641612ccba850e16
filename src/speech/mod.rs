//! Speech synthesis backends.
//!
//! Engines implement [`SpeechEngine`] and report progress on a
//! [`SpeechEventSender`], every event tagged with its utterance's generation.

pub mod command;
pub mod engine;
pub mod estimated;
mod pacing;

pub use command::CommandSpeechEngine;
pub use engine::{
    EngineCall, Generation, MockSpeechEngine, SpeechEngine, SpeechEvent, SpeechEventKind,
    SpeechEventReceiver, SpeechEventSender, Utterance, speech_channel,
};
pub use estimated::EstimatedSpeechEngine;

use crate::config::{SpeechBackend, SpeechConfig};

/// Build the engine selected by `config`, reporting on `events`.
pub fn create_engine(config: &SpeechConfig, events: SpeechEventSender) -> Box<dyn SpeechEngine> {
    match config.backend {
        SpeechBackend::Estimated => Box::new(EstimatedSpeechEngine::new(
            events,
            config.words_per_minute,
        )),
        SpeechBackend::Command => Box::new(CommandSpeechEngine::new(
            config.command.clone(),
            config.args.clone(),
            events,
            config.words_per_minute,
        )),
    }
}
