use std::env;
use std::sync::Arc;
use nc_core::{NewsSource, Result};

pub mod cli;
pub mod feed;
pub mod logging;
pub mod sources;

pub use cli::{NewsArgs, SourceKind};
pub use feed::{Feed, Page, DEFAULT_PER_PAGE};
pub use logging::{init_logging, Logger};
pub use sources::file::FileSource;
pub use sources::thenewsapi::TheNewsApiSource;

pub const DEFAULT_NEWS_API_URL: &str = "https://api.thenewsapi.com/v1";

/// Query parameters for the news API.
#[derive(Clone)]
pub struct NewsConfig {
    pub api_token: Option<String>,
    pub base_url: String,
    pub categories: String,
    pub search: String,
    pub language: String,
    pub limit: u32,
}

impl std::fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsConfig")
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("categories", &self.categories)
            .field("search", &self.search)
            .field("language", &self.language)
            .field("limit", &self.limit)
            .finish()
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_NEWS_API_URL.to_string(),
            categories: "health".to_string(),
            search: "health".to_string(),
            language: "en".to_string(),
            limit: 150,
        }
    }
}

impl NewsConfig {
    /// Defaults plus `THENEWSAPI_TOKEN` from the environment.
    pub fn from_env() -> Self {
        Self {
            api_token: env::var("THENEWSAPI_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            ..Self::default()
        }
    }
}

/// Builds the source selected on the command line.
pub fn create_source(args: &NewsArgs, config: NewsConfig) -> Result<Arc<dyn NewsSource>> {
    match args.source {
        SourceKind::TheNewsApi => Ok(Arc::new(TheNewsApiSource::new(config)?)),
        SourceKind::File => {
            let path = args.file.clone().ok_or_else(|| {
                nc_core::Error::Config("--file is required with --source file".to_string())
            })?;
            Ok(Arc::new(FileSource::new(path)))
        }
    }
}

/// Fetches from `source`, logging failures and continuing with no articles.
pub async fn load_articles(source: &dyn NewsSource) -> Vec<nc_core::ArticleInput> {
    let logger = Logger::new().with_prefix(format!("[{}]", source.name()));
    match source.fetch_articles().await {
        Ok(articles) => {
            logger.info(&format!("📰 Loaded {} articles", articles.len()));
            articles
        }
        Err(e) => {
            logger.error(&format!("Failed to fetch articles: {}", e));
            Vec::new()
        }
    }
}

pub mod prelude {
    pub use super::{create_source, load_articles, Feed, NewsConfig, Page};
    pub use nc_core::{ArticleInput, NewsSource, Result, Error};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nc_core::{ArticleInput, Error};

    struct StaticSource(Option<Vec<ArticleInput>>);

    #[async_trait]
    impl NewsSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch_articles(&self) -> Result<Vec<ArticleInput>> {
            self.0
                .clone()
                .ok_or_else(|| Error::Fetch("502 Bad Gateway".to_string()))
        }
    }

    #[tokio::test]
    async fn test_load_articles() {
        let source = StaticSource(Some(vec![ArticleInput::new("a1", "Clinics open")]));
        let articles = load_articles(&source).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "a1");
    }

    #[tokio::test]
    async fn test_failed_fetch_yields_empty_feed() {
        init_logging(false);
        assert!(load_articles(&StaticSource(None)).await.is_empty());
    }
}
