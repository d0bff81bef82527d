//! The model port: what the pipeline needs from an inference endpoint.
//!
//! Nodes build [`CompletionRequest`]s from these provider-neutral types and
//! hand them to an [`LlmProvider`]. The `llm` crate supplies the HTTP
//! implementation; tests supply scripted ones.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ModelId, RetryPolicy, TokenUsage};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions that frame the model's behaviour.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
}

/// One segment of a mixed text + image message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Plain text.
    Text(String),
    /// A data URI or remote URL, opaque to the pipeline.
    ImageUrl(String),
}

/// Body of a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Text-only content.
    Text(String),
    /// Vision-augmented content.
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Concatenated text of every text segment.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text(text) => Some(text.as_str()),
                    ContentPart::ImageUrl(_) => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Returns `true` if any segment is an image.
    pub fn has_image(&self) -> bool {
        matches!(self, Self::Parts(parts) if parts.iter().any(|p| matches!(p, ContentPart::ImageUrl(_))))
    }
}

/// A single message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: MessageContent,
}

impl ChatMessage {
    /// A text-only system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A text-only user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message with the text first and the image attached after it.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text(text.into()),
                ContentPart::ImageUrl(image_url.into()),
            ]),
        }
    }

    /// A user message that carries the image only when one is supplied.
    pub fn user_with_optional_image(text: impl Into<String>, image_url: Option<&str>) -> Self {
        match image_url {
            Some(url) => Self::user_with_image(text, url),
            None => Self::user(text),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// Everything a provider needs to run one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: ModelId,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub repetition_penalty: Option<f32>,
}

/// The first choice returned by the endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Generated text; `None` when the endpoint returned no content.
    pub text: Option<String>,
    /// Token usage, when the endpoint reports it.
    pub usage: Option<TokenUsage>,
}

impl Completion {
    /// A completion with the given text and no usage report.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            usage: None,
        }
    }

    /// The generated text, or an empty string for degenerate output.
    pub fn into_text(self) -> String {
        self.text.unwrap_or_default()
    }

    /// The generated text if it contains anything besides whitespace.
    pub fn non_blank_text(self) -> Option<String> {
        self.text.filter(|t| !t.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures reaching or talking to the inference endpoint.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// No access credential is configured.
    #[error("missing API credential: {0}")]
    MissingCredential(String),

    /// The request never produced an HTTP response.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The endpoint answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The endpoint asked us to slow down.
    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// The response body could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Whether the failed call is safe to repeat.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Http(_) => RetryPolicy::Retryable { after: None },
            Self::RateLimited { retry_after } => RetryPolicy::Retryable {
                after: *retry_after,
            },
            Self::Api { status, .. } if *status >= 500 => RetryPolicy::Retryable { after: None },
            Self::Api { .. } | Self::MissingCredential(_) | Self::InvalidResponse(_) => {
                RetryPolicy::NonRetryable
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// A model-invocation capability.
///
/// Implementations must support both text-only and vision-augmented messages
/// and must not retry on their own.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Runs one completion and returns the first choice.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_messages_put_text_first() {
        let msg = ChatMessage::user_with_image("describe", "data:image/png;base64,AAA");
        assert_eq!(msg.role, ChatRole::User);
        assert!(msg.content.has_image());
        assert_eq!(msg.content.text(), "describe");
        match msg.content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts[0], ContentPart::Text("describe".into()));
            }
            MessageContent::Text(_) => panic!("expected parts"),
        }
    }

    #[test]
    fn optional_image_falls_back_to_text() {
        let msg = ChatMessage::user_with_optional_image("hi", None);
        assert_eq!(msg.content, MessageContent::Text("hi".into()));
    }

    #[test]
    fn blank_completions_are_degenerate() {
        assert_eq!(Completion::text("  \n").non_blank_text(), None);
        assert_eq!(Completion::default().into_text(), "");
    }

    #[test]
    fn retry_policy_follows_status() {
        let rate = LlmError::RateLimited {
            retry_after: Some(Duration::from_secs(3)),
        };
        assert_eq!(
            rate.retry_policy(),
            RetryPolicy::Retryable {
                after: Some(Duration::from_secs(3))
            }
        );
        let client = LlmError::Api {
            status: 400,
            message: "bad".into(),
        };
        assert_eq!(client.retry_policy(), RetryPolicy::NonRetryable);
        assert_eq!(
            LlmError::MissingCredential("HF_TOKEN".into()).retry_policy(),
            RetryPolicy::NonRetryable
        );
    }
}
