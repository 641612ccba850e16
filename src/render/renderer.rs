use crate::config::RenderConfig;
use crate::defaults;
use crate::narration::state::Highlight;
use crate::render::active::render_active;
use crate::render::article::{Article, RelatedArticle};
use crate::render::passive::render_passive;
use crate::render::tree::{RenderMode, RenderTree};

/// Turns an article and the narration position into a render tree.
///
/// Stateless between calls; every narration update is a fresh render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynchronizedRenderer {
    /// Paragraph positions after which related articles are injected, in order.
    pub read_also_after: Vec<usize>,
    /// URL prefix joined with a related article's slug.
    pub read_also_path: String,
}

impl Default for SynchronizedRenderer {
    fn default() -> Self {
        Self {
            read_also_after: defaults::READ_ALSO_AFTER.to_vec(),
            read_also_path: defaults::READ_ALSO_PATH.to_string(),
        }
    }
}

impl SynchronizedRenderer {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            read_also_after: config.read_also_after.clone(),
            read_also_path: config.read_also_path.clone(),
        }
    }

    /// Render passively when no sentence is highlighted, actively otherwise.
    ///
    /// Related articles only appear in passive mode.
    pub fn render(
        &self,
        article: &Article,
        highlight: Highlight,
        related: &[RelatedArticle],
    ) -> RenderTree {
        if !highlight.is_active() {
            return RenderTree {
                mode: RenderMode::Passive,
                nodes: render_passive(
                    article.html(),
                    related,
                    &self.read_also_after,
                    &self.read_also_path,
                ),
                scroll_target: None,
            };
        }

        let (nodes, scroll_target) = render_active(article.html(), article.sentences(), highlight);
        if scroll_target.is_none() {
            tracing::debug!(
                sentence = highlight.sentence,
                "highlighted sentence not present in block layout"
            );
        }
        RenderTree {
            mode: RenderMode::Active,
            nodes,
            scroll_target,
        }
    }
}
