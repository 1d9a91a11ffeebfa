use async_trait::async_trait;
use crate::types::ArticleInput;
use crate::Result;

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Returns the name of the news source
    fn name(&self) -> &str;

    /// Fetch the current batch of articles
    async fn fetch_articles(&self) -> Result<Vec<ArticleInput>>;
}
