use crate::narration::state::PlaybackStatus;

/// Change notifications published by the narration controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationEvent {
    /// Playback status changed.
    Status(PlaybackStatus),
    /// Active sentence changed; `None` means narration ended.
    Sentence(Option<usize>),
    /// Playback position inside the active sentence moved.
    CharOffset(usize),
    /// The last sentence finished naturally, or there was nothing to read.
    Completed,
    /// The speech engine failed; narration is back to idle.
    Failed { message: String },
}

impl NarrationEvent {
    /// Whether the session is over after this event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_events() {
        assert!(NarrationEvent::Completed.is_terminal());
        assert!(
            NarrationEvent::Failed {
                message: "x".to_string()
            }
            .is_terminal()
        );
        assert!(!NarrationEvent::Sentence(None).is_terminal());
        assert!(!NarrationEvent::CharOffset(3).is_terminal());
    }
}
