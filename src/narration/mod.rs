//! Interruptible sentence-by-sentence narration.

pub mod controller;
pub mod events;
pub mod state;

pub use controller::NarrationController;
pub use events::NarrationEvent;
pub use state::{Highlight, PlaybackState, PlaybackStatus};
