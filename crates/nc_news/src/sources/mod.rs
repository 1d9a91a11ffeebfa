use nc_core::{ArticleInput, NewsArticle};
use serde::Deserialize;

pub mod file;
pub mod thenewsapi;

/// `{ "data": [...] }` response envelope. A missing `data` field is an empty feed.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub data: Vec<NewsArticle>,
}

pub(crate) fn into_inputs(articles: Vec<NewsArticle>) -> Vec<ArticleInput> {
    articles.into_iter().map(ArticleInput::from).collect()
}
