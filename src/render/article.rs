//! Render inputs: the article body and its related articles.

use crate::error::{ReadaloudError, Result};
use crate::render::tree::ReadAlsoCard;
use crate::text::segmenter::{Sentence, segment};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// An article body and the sentences narration walks through.
///
/// Sentences are computed once here. Changing the body means building a new
/// `Article`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    html: String,
    sentences: Vec<Sentence>,
}

impl Article {
    pub fn new(html: impl Into<String>) -> Self {
        let html = html.into();
        let sentences = segment(&html);
        Self { html, sentences }
    }

    /// Read an article body from an HTML file.
    pub fn load(path: &Path) -> Result<Self> {
        let html = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReadaloudError::ArticleNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ReadaloudError::Io(e)
            }
        })?;
        Ok(Self::new(html))
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }
}

/// Identifier of a related article, as the content API hands it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Number(n) => write!(f, "{n}"),
            ArticleId::Text(s) => f.write_str(s),
        }
    }
}

/// A suggested article for "Read Also" cards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelatedArticle {
    #[serde(default)]
    pub id: Option<ArticleId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl RelatedArticle {
    pub fn new(title: &str, slug: &str) -> Self {
        Self {
            id: None,
            title: Some(title.to_string()),
            slug: Some(slug.to_string()),
        }
    }

    /// Build the card linking to this article, or `None` if title or slug is missing.
    pub fn card(&self, path_prefix: &str) -> Option<ReadAlsoCard> {
        let title = self.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let slug = self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (title, slug) {
            (Some(title), Some(slug)) => Some(ReadAlsoCard {
                title: title.to_string(),
                href: format!("{path_prefix}{slug}"),
            }),
            _ => {
                tracing::warn!(
                    id = self.id.as_ref().map(ToString::to_string),
                    "related article without title or slug, card omitted"
                );
                None
            }
        }
    }
}

/// Parse a JSON array of related articles.
pub fn parse_related(json: &str) -> Result<Vec<RelatedArticle>> {
    serde_json::from_str(json).map_err(|e| ReadaloudError::RelatedArticles {
        message: e.to_string(),
    })
}

/// Read related articles from a JSON file.
pub fn load_related(path: &Path) -> Result<Vec<RelatedArticle>> {
    let json = fs::read_to_string(path)?;
    parse_related(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn article_segments_once() {
        let article = Article::new("<p>One sentence. Another one.</p>");
        assert_eq!(article.sentences().len(), 2);
        assert_eq!(article.html(), "<p>One sentence. Another one.</p>");
    }

    #[test]
    fn load_missing_article_reports_path() {
        let result = Article::load(Path::new("/nonexistent/story.html"));
        match result {
            Err(ReadaloudError::ArticleNotFound { path }) => {
                assert_eq!(path, "/nonexistent/story.html");
            }
            other => panic!("Expected ArticleNotFound, got {other:?}"),
        }
    }

    #[test]
    fn load_article_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<p>Loaded from disk.</p>").unwrap();
        let article = Article::load(file.path()).unwrap();
        assert_eq!(article.sentences()[0].text, "Loaded from disk.");
    }

    #[test]
    fn card_links_to_slug() {
        let card = RelatedArticle::new("Rates rise", "rates-rise").card("/news/");
        assert_eq!(
            card,
            Some(ReadAlsoCard {
                title: "Rates rise".to_string(),
                href: "/news/rates-rise".to_string(),
            })
        );
    }

    #[test]
    fn card_is_omitted_without_title_or_slug() {
        let no_slug = RelatedArticle {
            title: Some("Orphan".to_string()),
            ..RelatedArticle::default()
        };
        let blank_title = RelatedArticle::new("  ", "slug");
        assert_eq!(no_slug.card("/news/"), None);
        assert_eq!(blank_title.card("/news/"), None);
    }

    #[test]
    fn parse_related_accepts_numeric_and_text_ids() {
        let related = parse_related(
            r#"[{"id": 12, "title": "A", "slug": "a"}, {"id": "x9", "title": "B"}, {}]"#,
        )
        .unwrap();
        assert_eq!(related.len(), 3);
        assert_eq!(related[0].id, Some(ArticleId::Number(12)));
        assert_eq!(related[1].id, Some(ArticleId::Text("x9".to_string())));
        assert_eq!(related[1].slug, None);
        assert_eq!(related[2], RelatedArticle::default());
    }

    #[test]
    fn parse_related_rejects_non_array() {
        let result = parse_related(r#"{"title": "A"}"#);
        assert!(matches!(result, Err(ReadaloudError::RelatedArticles { .. })));
    }
}
