//! Article rendering in passive reading mode and active narration mode.

pub mod active;
pub mod article;
pub mod links;
pub mod passive;
pub mod renderer;
pub mod scroll;
pub mod tree;

pub use article::{Article, ArticleId, RelatedArticle, load_related, parse_related};
pub use renderer::SynchronizedRenderer;
pub use scroll::{ScrollRequest, ScrollScheduler};
pub use tree::{
    ReadAlsoCard, RenderMode, RenderNode, RenderTree, SentenceNode, SentenceStyle, WordToken,
};
