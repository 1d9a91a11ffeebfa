use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use nc_core::{Error, Result};
use url::Url;

pub mod fallback;
pub mod models;
pub mod normalize;
pub mod prompt;
pub mod relevance;
pub mod response;
pub mod runner;
pub mod sanitize;
pub mod summarizer;

pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_SUMMARY_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";
pub const DEFAULT_REWRITE_MODEL: &str = "meta-llama/Meta-Llama-3-8B-Instruct";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    /// Any OpenAI-compatible chat-completions endpoint
    #[default]
    OpenAi,
    /// Offline canned responses
    Dummy,
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "hf" | "huggingface" => Ok(Self::OpenAi),
            "dummy" => Ok(Self::Dummy),
            other => Err(Error::Config(format!(
                "Unknown model '{}'. Available models: openai (default), dummy",
                other
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Dummy => write!(f, "dummy"),
        }
    }
}

/// Sampling parameters for one kind of request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Clone)]
pub struct InferenceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub summary_model: String,
    pub rewrite_model: String,
    pub model_kind: ModelKind,
    pub summary_sampling: Sampling,
    pub rewrite_sampling: Sampling,
    pub timeout: Duration,
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("summary_model", &self.summary_model)
            .field("rewrite_model", &self.rewrite_model)
            .field("model_kind", &self.model_kind)
            .field("summary_sampling", &self.summary_sampling)
            .field("rewrite_sampling", &self.rewrite_sampling)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            rewrite_model: DEFAULT_REWRITE_MODEL.to_string(),
            model_kind: ModelKind::default(),
            summary_sampling: Sampling { temperature: 0.7, max_tokens: 300 },
            rewrite_sampling: Sampling { temperature: 0.8, max_tokens: 800 },
            timeout: Duration::from_secs(60),
        }
    }
}

impl InferenceConfig {
    /// Build a config from `HF_TOKEN`, `NC_INFERENCE_URL`, `NC_SUMMARY_MODEL`
    /// and `NC_REWRITE_MODEL`, falling back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = non_empty_var("HF_TOKEN");
        if let Some(url) = non_empty_var("NC_INFERENCE_URL") {
            config.base_url = url;
        }
        if let Some(model) = non_empty_var("NC_SUMMARY_MODEL") {
            config.summary_model = model;
        }
        if let Some(model) = non_empty_var("NC_REWRITE_MODEL") {
            config.rewrite_model = model;
        }
        config
    }

    /// Checks the base URL parses and strips any trailing slash.
    pub fn validated(mut self) -> Result<Self> {
        let parsed = Url::parse(&self.base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "Unsupported scheme for inference endpoint: {}",
                parsed.scheme()
            )));
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub mod prelude {
    pub use super::{InferenceConfig, ModelKind, Sampling};
    pub use super::models::create_model;
    pub use super::summarizer::Summarizer;
    pub use super::runner::{RunEvent, RunMode, SummaryRun};
    pub use nc_core::{ArticleInput, RewriteResult, SummaryResult, Result, Error};
}

pub use fallback::{fallback_rewrite, fallback_summary};
pub use models::create_model;
pub use normalize::{normalize_rewrite, normalize_summary};
pub use relevance::is_relevant;
pub use summarizer::Summarizer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parsing() {
        assert_eq!("openai".parse::<ModelKind>().unwrap(), ModelKind::OpenAi);
        assert_eq!("Dummy".parse::<ModelKind>().unwrap(), ModelKind::Dummy);
        assert!("ollama".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_config_validation() {
        let config = InferenceConfig {
            base_url: "https://example.com/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validated().unwrap().base_url, "https://example.com/v1");

        let config = InferenceConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validated().is_err());

        let config = InferenceConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = InferenceConfig {
            api_key: Some("secret-token".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
