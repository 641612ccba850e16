use serde::Serialize;

/// Where a narration session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Snapshot of a narration session.
///
/// `sentence_index` is `None` exactly when `status` is `Idle`. `char_offset`
/// is a byte offset into the current sentence and is 0 whenever the sentence
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub sentence_index: Option<usize>,
    pub char_offset: usize,
}

impl PlaybackState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.status == PlaybackStatus::Idle
    }

    /// What the renderer should highlight for this state.
    pub fn highlight(&self) -> Highlight {
        Highlight {
            sentence: self.sentence_index,
            char_offset: self.char_offset,
        }
    }
}

/// The renderer's view of playback: which sentence and where inside it.
///
/// `sentence: None` selects passive reading mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Highlight {
    pub sentence: Option<usize>,
    pub char_offset: usize,
}

impl Highlight {
    /// No narration in progress.
    pub fn passive() -> Self {
        Self::default()
    }

    pub fn at(sentence: usize, char_offset: usize) -> Self {
        Self {
            sentence: Some(sentence),
            char_offset,
        }
    }

    pub fn is_active(&self) -> bool {
        self.sentence.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_state_highlights_nothing() {
        let state = PlaybackState::idle();
        assert!(state.is_idle());
        assert_eq!(state.highlight(), Highlight::passive());
        assert!(!state.highlight().is_active());
    }

    #[test]
    fn playing_state_highlights_its_sentence() {
        let state = PlaybackState {
            status: PlaybackStatus::Playing,
            sentence_index: Some(3),
            char_offset: 7,
        };
        assert_eq!(state.highlight(), Highlight::at(3, 7));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&PlaybackStatus::Paused).unwrap();
        assert_eq!(json, "\"paused\"");
    }
}
