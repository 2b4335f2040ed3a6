use serde::{Deserialize, Serialize};

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single turn of a conversation, sent to providers verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self { role: Role::System, content: content.to_string() }
    }

    pub fn user(content: &str) -> Self {
        Self { role: Role::User, content: content.to_string() }
    }

    pub fn assistant(content: &str) -> Self {
        Self { role: Role::Assistant, content: content.to_string() }
    }
}

/// Optional generation parameters; each adapter applies its own defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Generated text plus the untouched provider response
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub text: String,
    /// Kept for diagnostics only, never interpreted
    pub raw: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_with_lowercase_role() {
        let messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];

        let value = serde_json::to_value(&messages).unwrap();
        assert_eq!(
            value,
            json!([
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"},
            ])
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_value::<ChatMessage>(json!({"role": "tool", "content": "x"}));
        assert!(result.is_err());
    }
}
