use std::path::PathBuf;
use async_trait::async_trait;
use nc_core::{ArticleInput, NewsArticle, NewsSource, Result};
use serde::Deserialize;

use super::{into_inputs, Envelope};

/// Articles saved to disk, either as a bare array or a `{ "data": [...] }`
/// envelope as returned by the news API.
pub struct FileSource {
    path: PathBuf,
    name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileContents {
    List(Vec<NewsArticle>),
    Envelope(Envelope),
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    pub fn parse(json: &str) -> Result<Vec<ArticleInput>> {
        let articles = match serde_json::from_str::<FileContents>(json)? {
            FileContents::List(articles) => articles,
            FileContents::Envelope(envelope) => envelope.data,
        };
        Ok(into_inputs(articles))
    }
}

#[async_trait]
impl NewsSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_articles(&self) -> Result<Vec<ArticleInput>> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        Self::parse(&json)
    }
}
