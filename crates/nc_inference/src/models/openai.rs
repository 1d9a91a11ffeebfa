use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use nc_core::{ChatModel, ChatRequest, Error, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::response::ResponseShape;
use crate::sanitize::truncate_chars;
use crate::InferenceConfig;

/// Any endpoint speaking the OpenAI chat-completions protocol
/// (Hugging Face router, vLLM, llama.cpp server, ...).
pub struct OpenAiCompatModel {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiCompatModel {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client: Arc::new(client),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl fmt::Debug for OpenAiCompatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatModel {
    fn name(&self) -> &str {
        "OpenAI-compatible"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let mut builder = self.client.post(self.endpoint()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "{} returned {}: {}",
                self.endpoint(),
                status,
                truncate_chars(&body, 200)
            )));
        }

        let body: Value = response.json().await?;
        let shape = ResponseShape::from_value(&body);
        debug!("Completion shape: {:?}", shape);
        shape.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use nc_core::ChatMessage;
    use serde_json::json;
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request() -> ChatRequest {
        ChatRequest {
            model: "test-model".to_string(),
            messages: vec![ChatMessage::user("Summarize this.")],
            temperature: 0.7,
            max_tokens: 300,
            seed: Some(3),
        }
    }

    fn model(base_url: String, api_key: Option<&str>) -> OpenAiCompatModel {
        OpenAiCompatModel::new(&InferenceConfig {
            base_url,
            api_key: api_key.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_chat_completion_roundtrip() {
        let app = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": format!("{}|{}", body["model"].as_str().unwrap_or_default(), auth)}}]
                }))
            }),
        );
        let base_url = serve(app).await;

        let text = model(base_url, Some("secret")).complete(&request()).await.unwrap();
        assert_eq!(text, "test-model|Bearer secret");
    }

    #[tokio::test]
    async fn test_error_status_is_inference_error() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base_url = serve(app).await;

        let err = model(base_url, None).complete(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Inference(ref msg) if msg.contains("429") && msg.contains("slow down")));
    }

    #[tokio::test]
    async fn test_unrecognized_body() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({"error": {"message": "model loading"}})) }),
        );
        let base_url = serve(app).await;

        let err = model(base_url, None).complete(&request()).await.unwrap_err();
        assert!(matches!(err, Error::UnrecognizedResponse(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let model = model("http://localhost:1".to_string(), Some("secret"));
        assert!(!format!("{:?}", model).contains("secret"));
    }
}
