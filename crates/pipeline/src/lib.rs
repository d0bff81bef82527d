//! Core orchestration domain for UI Forge.
//!
//! This crate contains every domain concept of the generation pipeline: the
//! context threaded through a run, the input sanitiser and request classifier,
//! the cleanup transforms applied to generated markup, and the [`LlmProvider`]
//! port the nodes call through. Infrastructure crates implement the traits
//! defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`PipelineRunId`, `NodeId`, `ModelId`) |
//! | [`types`] | Shared value types (`TokenUsage`, `ConversationTurn`, `Timestamp`) |
//! | [`errors`] | Top-level error and retry-policy types |
//! | [`llm`] | Model port: messages, requests, `LlmProvider`, `LlmError` |
//! | [`sanitizer`] | Prompt-injection redaction and truncation |
//! | [`classifier`] | Code-request classification |
//! | [`cleaning`] | Fence, preamble and declaration cleanup of generated markup |
//! | [`context`] | `PipelineContext`, `ContextUpdate`, input and output records |
//! | [`run`] | Pipeline shapes and controller states |
//! | [`config`] | Per-node model settings |

pub mod classifier;
pub mod cleaning;
pub mod config;
pub mod context;
pub mod errors;
pub mod identifiers;
pub mod llm;
pub mod run;
pub mod sanitizer;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use classifier::{classify, Classification, ClassificationReason, Verdict};
pub use config::{ModelSettings, PipelineConfig, DEFAULT_MODEL};
pub use context::{ContextUpdate, PipelineContext, PipelineInput, PipelineOutput};
pub use errors::{PipelineError, RetryPolicy};
pub use identifiers::{ModelId, NodeId, PipelineRunId};
pub use llm::{
    ChatMessage, ChatRole, Completion, CompletionRequest, ContentPart, LlmError, LlmProvider,
    MessageContent,
};
pub use run::{PipelineRun, PipelineState};
pub use sanitizer::{sanitize, sanitize_with_report, InjectionCategory, Sanitized, FILTERED};
pub use types::{ConversationTurn, Timestamp, TokenCount, TokenUsage};
