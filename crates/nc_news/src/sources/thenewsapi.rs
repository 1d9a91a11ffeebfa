use std::sync::Arc;
use async_trait::async_trait;
use nc_core::{ArticleInput, Error, NewsSource, Result};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::{into_inputs, Envelope};
use crate::NewsConfig;

/// Health headlines from thenewsapi.com.
pub struct TheNewsApiSource {
    client: Arc<Client>,
    config: NewsConfig,
}

impl TheNewsApiSource {
    pub fn new(config: NewsConfig) -> Result<Self> {
        Url::parse(&config.base_url)?;
        if config.api_token.is_none() {
            warn!("⚠️ THENEWSAPI_TOKEN is not set, the news API will reject requests");
        }
        Ok(Self {
            client: Arc::new(Client::new()),
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/news/all", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NewsSource for TheNewsApiSource {
    fn name(&self) -> &str {
        "thenewsapi"
    }

    async fn fetch_articles(&self) -> Result<Vec<ArticleInput>> {
        let limit = self.config.limit.to_string();
        let query = [
            ("api_token", self.config.api_token.as_deref().unwrap_or_default()),
            ("categories", self.config.categories.as_str()),
            ("search", self.config.search.as_str()),
            ("language", self.config.language.as_str()),
            ("limit", limit.as_str()),
        ];
        debug!("Fetching {}", self.endpoint());

        let response = self.client.get(self.endpoint()).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{} returned {}", self.endpoint(), status)));
        }

        let envelope: Envelope = response.json().await?;
        Ok(into_inputs(envelope.data))
    }
}
