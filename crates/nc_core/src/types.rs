use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of takeaways every summary carries.
pub const TAKEAWAY_COUNT: usize = 3;

/// An article as the rest of the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleInput {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl ArticleInput {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            content: None,
            snippet: None,
            url: None,
            image_url: None,
            source: None,
            published_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Text handed to the summarizer: description, then content, then title.
    pub fn summary_source(&self) -> &str {
        first_non_blank(&[&self.description, &self.content]).unwrap_or(&self.title)
    }

    /// Text handed to the rewriter: snippet, then content, then title.
    pub fn rewrite_source(&self) -> &str {
        first_non_blank(&[&self.snippet, &self.content]).unwrap_or(&self.title)
    }

    pub fn title(&self) -> Option<&str> {
        let title = self.title.trim();
        (!title.is_empty()).then_some(title)
    }
}

fn first_non_blank<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .find(|s| !s.trim().is_empty())
}

/// Article record as returned by the news API.
///
/// Aliases cover the field names used by the alternative feed provider
/// (`id`, `link`, `photo_url`, `source_name`, `published_datetime_utc`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default, alias = "id")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
    #[serde(default, alias = "photo_url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, alias = "published_datetime_utc")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "source_name")]
    pub source: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl From<NewsArticle> for ArticleInput {
    fn from(article: NewsArticle) -> Self {
        let id = article
            .uuid
            .filter(|id| !id.trim().is_empty())
            .or_else(|| article.url.clone())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Self {
            id,
            title: article.title,
            description: article.description,
            content: article.content,
            snippet: article.snippet,
            url: article.url,
            image_url: article.image_url,
            source: article.source,
            published_at: article.published_at,
        }
    }
}

/// One-line summary plus exactly three takeaways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub tldr: String,
    pub takeaways: [String; TAKEAWAY_COUNT],
}

impl SummaryResult {
    pub fn new(tldr: impl Into<String>, takeaways: [String; TAKEAWAY_COUNT]) -> Self {
        Self {
            tldr: tldr.into(),
            takeaways,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub content: String,
}
