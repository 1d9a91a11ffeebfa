use nc_core::{Error, Result};
use serde_json::Value;

/// Known shapes of a completion body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `{"choices": [{"message": {"content": "..."}}]}`
    Chat(String),
    /// `{"choices": [{"text": "..."}]}`
    Completion(String),
    /// `{"content": "..."}`
    Content(String),
    /// `{"text": "..."}`
    Text(String),
    /// `{"rewrite": "..."}`
    Rewrite(String),
    /// `{"result": "..."}`
    Result(String),
    /// A bare JSON string
    Plain(String),
    /// Anything else, with a short description of what was seen
    Unrecognized(String),
}

impl ResponseShape {
    pub fn from_value(value: &Value) -> Self {
        if let Value::String(s) = value {
            return Self::Plain(s.clone());
        }

        if let Some(choice) = value.get("choices").and_then(|c| c.get(0)) {
            if let Some(content) = choice
                .get("message")
                .and_then(|m| m.get("content"))
                .and_then(Value::as_str)
            {
                return Self::Chat(content.to_string());
            }
            if let Some(text) = choice.get("text").and_then(Value::as_str) {
                return Self::Completion(text.to_string());
            }
        }

        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        if let Some(s) = field("content") {
            return Self::Content(s);
        }
        if let Some(s) = field("text") {
            return Self::Text(s);
        }
        if let Some(s) = field("rewrite") {
            return Self::Rewrite(s);
        }
        if let Some(s) = field("result") {
            return Self::Result(s);
        }

        Self::Unrecognized(describe(value))
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            Self::Chat(s)
            | Self::Completion(s)
            | Self::Content(s)
            | Self::Text(s)
            | Self::Rewrite(s)
            | Self::Result(s)
            | Self::Plain(s) => Ok(s),
            Self::Unrecognized(diagnostic) => Err(Error::UnrecognizedResponse(diagnostic)),
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Object(map) if map.is_empty() => "empty object".to_string(),
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
    }
}
