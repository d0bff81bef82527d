//! HTTP implementation of [`LlmProvider`].

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{Completion, CompletionRequest, LlmError, LlmProvider};
use reqwest::{header, Client, StatusCode};

use crate::config::ProviderConfig;
use crate::wire::{ChatCompletionRequest, ChatCompletionResponse};

/// Longest error body carried into an [`LlmError::Api`] message.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Chat-completions client for Hugging Face's router or any compatible endpoint.
#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
    http: Client,
    config: ProviderConfig,
}

impl HuggingFaceProvider {
    /// # Errors
    ///
    /// [`LlmError::MissingCredential`] when `config.api_key` is blank, and
    /// [`LlmError::Http`] when the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential("API key must not be empty".into()));
        }
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LlmError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Reads [`ProviderConfig::from_env`] and builds a provider from it.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(ProviderConfig::from_env()?)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let body = ChatCompletionRequest::from(&request);

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            tracing::warn!(model = %request.model, ?retry_after, "rate limited by model endpoint");
            return Err(LlmError::RateLimited { retry_after });
        }

        if status.is_client_error() || status.is_server_error() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "(no body)".into());
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            tracing::warn!(
                model = %request.model,
                status = status.as_u16(),
                "model endpoint returned an error"
            );
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))?;

        Ok(parsed.into())
    }
}
