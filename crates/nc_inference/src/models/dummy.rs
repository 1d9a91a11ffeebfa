use std::fmt;
use nc_core::{ChatModel, ChatRequest, Result};

use crate::sanitize::sentences;

/// Offline model answering in the expected formats from the prompt itself.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Article text between the `Article:` marker and the format instructions.
fn article_text(prompt: &str) -> &str {
    let start = prompt
        .find("Article:")
        .map(|i| i + "Article:".len())
        .unwrap_or(0);
    let rest = &prompt[start..];
    let end = rest.find("\n\nRespond").unwrap_or(rest.len());
    rest[..end].trim()
}

#[async_trait::async_trait]
impl ChatModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let prompt = request.user_content().unwrap_or_default();
        let text = article_text(prompt);
        let parts: Vec<&str> = sentences(text).take(4).collect();

        if prompt.contains("TL;DR:") {
            let tldr = parts.first().copied().unwrap_or("Nothing to summarize");
            let takeaways: Vec<String> = parts
                .iter()
                .skip(1)
                .enumerate()
                .map(|(i, s)| format!("{}. {}.", i + 1, s))
                .collect();
            Ok(format!("TL;DR: {}.\n\nKey Takeaways:\n{}", tldr, takeaways.join("\n")))
        } else {
            Ok(format!(
                "Here's a friendly rewrite:\n\n{}. That's the gist of it, told plainly.",
                parts.join(". ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_summary;
    use crate::prompt::{rewrite_prompt, summary_prompt};

    const TEXT: &str = "Hospitals are opening rural clinics. Travel times drop for patients. \
                        Staffing remains a challenge. Funding comes from the state.";

    fn request(messages: Vec<nc_core::ChatMessage>) -> ChatRequest {
        ChatRequest {
            model: "dummy".to_string(),
            messages,
            temperature: 0.0,
            max_tokens: 10,
            seed: None,
        }
    }

    #[tokio::test]
    async fn test_dummy_summary_follows_contract() {
        let model = DummyModel::new();
        let messages = summary_prompt(TEXT, Some("Clinics"), None, 1).into_messages();
        let raw = model.complete(&request(messages)).await.unwrap();

        assert!(raw.starts_with("TL;DR: Hospitals are opening rural clinics."));
        let summary = normalize_summary(&raw, TEXT, None);
        assert_eq!(summary.tldr, "Hospitals are opening rural clinics.");
        assert_eq!(summary.takeaways[0], "Travel times drop for patients.");
        assert_eq!(summary.takeaways[2], "Funding comes from the state.");
    }

    #[tokio::test]
    async fn test_dummy_rewrite() {
        let model = DummyModel::new();
        let messages = rewrite_prompt(TEXT, None, 1).into_messages();
        let raw = model.complete(&request(messages)).await.unwrap();
        assert!(raw.contains("Hospitals are opening rural clinics. Travel times drop for patients"));
    }
}
