//! Plain-text extraction and segmentation for article bodies.

pub mod markup;
pub mod segmenter;
pub mod words;

pub use markup::{Block, BlockTag, blocks, strip_markup};
pub use segmenter::{Sentence, segment, split_sentences};
pub use words::{WordSpan, clamp_offset, word_spans, word_starts};
