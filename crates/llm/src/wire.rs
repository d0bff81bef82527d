//! JSON shapes of the OpenAI-compatible chat-completions protocol.
//!
//! Serde-serializable to JSON for HTTP calls. The pipeline's own message types
//! stay transport-neutral and are converted at this boundary.

use pipeline::{
    ChatMessage, ChatRole, Completion, CompletionRequest, ContentPart, MessageContent, TokenUsage,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: ChatRole,
    pub content: WireContent,
}

/// A bare string for text-only messages, an array of parts otherwise.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WirePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl From<&CompletionRequest> for ChatCompletionRequest {
    fn from(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.as_str().to_owned(),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            repetition_penalty: request.repetition_penalty,
        }
    }
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        let content = match &message.content {
            MessageContent::Text(text) => WireContent::Text(text.clone()),
            MessageContent::Parts(parts) => {
                WireContent::Parts(parts.iter().map(WirePart::from).collect())
            }
        };
        Self {
            role: message.role,
            content,
        }
    }
}

impl From<&ContentPart> for WirePart {
    fn from(part: &ContentPart) -> Self {
        match part {
            ContentPart::Text(text) => Self::Text { text: text.clone() },
            ContentPart::ImageUrl(url) => Self::ImageUrl {
                image_url: ImageUrl { url: url.clone() },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl From<ChatCompletionResponse> for Completion {
    /// Keeps only the first choice; missing content becomes `None`.
    fn from(response: ChatCompletionResponse) -> Self {
        Completion {
            text: response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
            usage: response
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pipeline::ModelId;
    use serde_json::json;

    use super::*;

    #[test]
    fn vision_messages_serialise_as_typed_parts() {
        let request = CompletionRequest {
            model: ModelId::from_static("Qwen/Qwen2.5-VL-7B-Instruct"),
            messages: vec![
                ChatMessage::system("be precise"),
                ChatMessage::user_with_image("describe", "data:image/png;base64,AAA"),
            ],
            max_tokens: 2000,
            temperature: 0.2,
            repetition_penalty: None,
        };

        let body = serde_json::to_value(ChatCompletionRequest::from(&request)).unwrap();

        assert_eq!(body["model"], "Qwen/Qwen2.5-VL-7B-Instruct");
        assert_eq!(body["max_tokens"], 2000);
        assert!(body.get("repetition_penalty").is_none());
        assert_eq!(
            body["messages"][0],
            json!({ "role": "system", "content": "be precise" })
        );
        assert_eq!(
            body["messages"][1]["content"],
            json!([
                { "type": "text", "text": "describe" },
                { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAA" } }
            ])
        );
    }

    #[test]
    fn first_choice_and_usage_are_kept() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "first" } },
                { "index": 1, "message": { "role": "assistant", "content": "second" } }
            ],
            "usage": { "prompt_tokens": 120, "completion_tokens": 30, "total_tokens": 150 }
        }))
        .unwrap();

        let completion = Completion::from(response);

        assert_eq!(completion.text.as_deref(), Some("first"));
        assert_eq!(completion.usage, Some(TokenUsage::new(120, 30)));
    }

    #[test]
    fn null_content_and_missing_usage_are_tolerated() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();

        let completion = Completion::from(response);

        assert_eq!(completion, Completion::default());
    }
}
