//! Top-level error and retry-policy types for the UI Forge pipeline domain.
//!
//! [`PipelineError`] covers conditions that end an invocation. Model-call
//! failures are defined next to the port in [`crate::llm`] and wrapped here with
//! the node that raised them.
//!
//! [`RetryPolicy`] is a cross-cutting concern: the pipeline never retries on its
//! own, but callers may re-invoke when an error reports itself as retryable.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmError;
use crate::NodeId;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// ## Rules
///
/// - `Retryable` errors: transport failures, server errors, rate-limit responses.
/// - `NonRetryable` errors: missing credentials, invalid configuration, client
///   errors, unparseable responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried.
    NonRetryable,
}

impl RetryPolicy {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable { .. })
    }
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors that terminate a pipeline invocation.
///
/// There is no partial-success return: when `invoke` yields one of these, no
/// plan or code from the run is handed to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The pipeline or provider configuration is invalid.
    ///
    /// Produced before any node runs; the pipeline never starts with an invalid config.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// A node's model call failed and the run was abandoned.
    #[error("Model call failed in node '{node}'")]
    Llm {
        /// The node whose call failed.
        node: NodeId,
        /// The underlying provider error.
        #[source]
        source: LlmError,
    },
}

impl PipelineError {
    /// Creates a [`PipelineError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the caller may re-invoke the whole pipeline.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Configuration { .. } => RetryPolicy::NonRetryable,
            Self::Llm { source, .. } => source.retry_policy(),
        }
    }
}
