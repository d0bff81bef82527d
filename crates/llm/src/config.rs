//! Endpoint and credential settings for [`crate::HuggingFaceProvider`].

use std::time::Duration;

use pipeline::LlmError;

/// Hugging Face's OpenAI-compatible inference router.
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";

/// The credential variable the hosted deployment uses.
pub const HF_TOKEN_ENV: &str = "HF_TOKEN";

/// Takes precedence over [`HF_TOKEN_ENV`] when both are set.
pub const API_KEY_ENV: &str = "UIFORGE_API_KEY";

/// Overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "UIFORGE_BASE_URL";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Where and how to reach the chat-completions endpoint.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    pub api_key: String,
    /// Upper bound on one HTTP exchange, including the response body.
    pub request_timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reads the credential and base URL from the process environment.
    ///
    /// # Errors
    ///
    /// [`LlmError::MissingCredential`] when neither credential variable holds a
    /// non-blank value.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = non_blank(API_KEY_ENV)
            .or_else(|| non_blank(HF_TOKEN_ENV))
            .ok_or_else(|| {
                LlmError::MissingCredential(format!("set {HF_TOKEN_ENV} or {API_KEY_ENV}"))
            })?;

        let mut config = Self::new(api_key.trim());
        if let Some(base_url) = non_blank(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
