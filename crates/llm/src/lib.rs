//! UI Forge model provider adapter.
//!
//! Implements the [`pipeline::LlmProvider`] trait for Hugging Face's
//! OpenAI-compatible chat-completions router. Any endpoint speaking the same
//! protocol works by changing [`ProviderConfig::base_url`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, response parsing and
//! rate-limit header handling live here. The [`pipeline`] crate sees only
//! [`pipeline::LlmProvider`]. Nothing in this crate retries; callers decide
//! based on [`pipeline::LlmError::retry_policy`].

pub mod config;
pub mod provider;
pub mod wire;

pub use config::{ProviderConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, HF_TOKEN_ENV};
pub use provider::HuggingFaceProvider;
