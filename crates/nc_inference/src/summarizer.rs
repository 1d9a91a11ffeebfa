use std::sync::Arc;
use nc_core::{ArticleInput, ChatModel, ChatRequest, RewriteResult, SummaryResult};
use tracing::{debug, info, warn};

use crate::fallback::{fallback_rewrite, fallback_summary};
use crate::normalize::{normalize_rewrite, normalize_summary};
use crate::prompt::{rewrite_prompt, summary_prompt, Prompt};
use crate::relevance::is_relevant;
use crate::sanitize::{clean_article_text, REWRITE_MAX_CHARS, SUMMARY_MAX_CHARS};
use crate::{InferenceConfig, Sampling};

/// Article in, structured summary or rewrite out.
///
/// Every failure along the way (transport, unrecognized response, useless or
/// off-topic output) degrades to the local fallback, so neither operation
/// returns an error.
#[derive(Debug, Clone)]
pub struct Summarizer {
    model: Arc<dyn ChatModel>,
    config: InferenceConfig,
}

impl Summarizer {
    pub fn new(model: Arc<dyn ChatModel>, config: InferenceConfig) -> Self {
        Self { model, config }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub async fn summarize(&self, article: &ArticleInput, request_seed: u64) -> SummaryResult {
        let title = article.title();
        let text = clean_article_text(article.summary_source(), SUMMARY_MAX_CHARS);
        if text.is_empty() {
            debug!("No text for article {}, using fallback summary", article.id);
            return fallback_summary(None, title);
        }

        info!("🤖 Summarizing article: {}", article.title);
        let prompt = summary_prompt(&text, title, article.url.as_deref(), request_seed);
        let raw = match self
            .call(prompt, &self.config.summary_model, self.config.summary_sampling, request_seed)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Summary request failed for {}: {}", article.id, e);
                return fallback_summary(Some(&text), title);
            }
        };

        let summary = normalize_summary(&raw, &text, title);
        if !is_relevant(&summary, &text) {
            warn!("Summary for {} did not match the article, using fallback", article.id);
            return fallback_summary(Some(&text), title);
        }

        info!("✨ Summary ready: {}", summary.tldr);
        summary
    }

    pub async fn rewrite(&self, article: &ArticleInput, request_seed: u64) -> RewriteResult {
        let title = article.title();
        let text = clean_article_text(article.rewrite_source(), REWRITE_MAX_CHARS);
        if text.is_empty() {
            return fallback_rewrite(&text);
        }

        info!("✍️ Rewriting article: {}", article.title);
        let prompt = rewrite_prompt(&text, title, request_seed);
        match self
            .call(prompt, &self.config.rewrite_model, self.config.rewrite_sampling, request_seed)
            .await
        {
            Ok(raw) => normalize_rewrite(&raw, &text),
            Err(e) => {
                warn!("Rewrite request failed for {}: {}", article.id, e);
                fallback_rewrite(&text)
            }
        }
    }

    async fn call(
        &self,
        prompt: Prompt,
        model: &str,
        sampling: Sampling,
        request_seed: u64,
    ) -> nc_core::Result<String> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: prompt.into_messages(),
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            seed: Some(request_seed),
        };
        debug!("Sending request to {} ({})", self.model.name(), model);
        let raw = self.model.complete(&request).await?;
        debug!("Raw completion: {}", raw);
        Ok(raw)
    }
}
