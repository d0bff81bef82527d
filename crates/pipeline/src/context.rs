//! The record threaded through one pipeline invocation.
//!
//! A [`PipelineContext`] is built from a [`PipelineInput`], then each step
//! returns a [`ContextUpdate`] naming only the fields it owns. The controller
//! folds updates into a new context with [`PipelineContext::apply`]: scalar
//! fields are last-write-wins, the message log is concatenated, token usage is
//! summed. Nothing here outlives the invocation.

use serde::{Deserialize, Serialize};

use crate::classifier::Classification;
use crate::{ConversationTurn, PipelineRunId, Timestamp, TokenUsage};

/// What the surrounding application passes to `invoke`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInput {
    pub user_request: String,
    /// Data URI or remote URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Prior artifact, present on refinement requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_code: Option<String>,
    /// Accumulated history. Carried through but never read by any prompt.
    #[serde(default)]
    pub messages: Vec<ConversationTurn>,
}

impl PipelineInput {
    /// Input with only a request.
    pub fn new(user_request: impl Into<String>) -> Self {
        Self {
            user_request: user_request.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_current_code(mut self, current_code: impl Into<String>) -> Self {
        self.current_code = Some(current_code.into());
        self
    }

    pub fn with_messages(mut self, messages: Vec<ConversationTurn>) -> Self {
        self.messages = messages;
        self
    }
}

/// Shared state for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineContext {
    /// Raw on entry; replaced by the sanitised text after classification.
    pub user_request: String,
    pub image_url: Option<String>,
    pub current_code: Option<String>,
    /// Defaults to `true` so an unclassified context still routes to generation.
    pub is_code_request: bool,
    pub plan: String,
    pub final_code: String,
    pub reply: String,
    pub messages: Vec<ConversationTurn>,
    pub token_usage: TokenUsage,
}

impl PipelineContext {
    /// Builds the initial context. Blank image URLs and blank prior code count as absent.
    pub fn new(input: PipelineInput) -> Self {
        Self {
            user_request: input.user_request,
            image_url: input.image_url.filter(|url| !url.trim().is_empty()),
            current_code: input.current_code.filter(|code| !code.trim().is_empty()),
            is_code_request: true,
            plan: String::new(),
            final_code: String::new(),
            reply: String::new(),
            messages: input.messages,
            token_usage: TokenUsage::default(),
        }
    }

    /// The image reference, if one was supplied.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Returns `true` when an image was supplied.
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }

    /// Returns `true` when this run modifies a prior artifact.
    pub fn is_refinement(&self) -> bool {
        self.current_code.is_some()
    }

    /// Merges a step's partial output, returning the new context.
    #[must_use]
    pub fn apply(mut self, update: ContextUpdate) -> Self {
        let ContextUpdate {
            user_request,
            is_code_request,
            plan,
            final_code,
            reply,
            messages,
            token_usage,
        } = update;

        if let Some(user_request) = user_request {
            self.user_request = user_request;
        }
        if let Some(is_code_request) = is_code_request {
            self.is_code_request = is_code_request;
        }
        if let Some(plan) = plan {
            self.plan = plan;
        }
        if let Some(final_code) = final_code {
            self.final_code = final_code;
        }
        if let Some(reply) = reply {
            self.reply = reply;
        }
        self.messages.extend(messages);
        self.token_usage += token_usage;
        self
    }

    /// Projects the finished context into the caller-facing result.
    pub fn into_output(
        self,
        run_id: PipelineRunId,
        started_at: Timestamp,
        finished_at: Timestamp,
    ) -> PipelineOutput {
        PipelineOutput {
            final_code: self.final_code,
            reply: self.reply,
            plan: self.plan,
            is_code_request: self.is_code_request,
            messages: self.messages,
            run_id,
            started_at,
            finished_at,
            token_usage: self.token_usage,
        }
    }
}

/// Partial output of one step. `None` fields are left untouched by the merge.
///
/// `image_url` and `current_code` are inputs only; no step may write them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextUpdate {
    pub user_request: Option<String>,
    pub is_code_request: Option<bool>,
    pub plan: Option<String>,
    pub final_code: Option<String>,
    pub reply: Option<String>,
    /// Appended to the log.
    pub messages: Vec<ConversationTurn>,
    /// Added to the running total.
    pub token_usage: TokenUsage,
}

impl ContextUpdate {
    pub fn plan(plan: impl Into<String>) -> Self {
        Self {
            plan: Some(plan.into()),
            ..Self::default()
        }
    }

    pub fn final_code(final_code: impl Into<String>) -> Self {
        Self {
            final_code: Some(final_code.into()),
            ..Self::default()
        }
    }

    pub fn reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Self::default()
        }
    }

    pub fn messages(messages: Vec<ConversationTurn>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Sets the final code alongside whatever else this update carries.
    #[must_use]
    pub fn and_final_code(mut self, final_code: impl Into<String>) -> Self {
        self.final_code = Some(final_code.into());
        self
    }

    /// Attaches the token usage of the call that produced this update.
    #[must_use]
    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.token_usage = usage.unwrap_or_default();
        self
    }
}

impl From<Classification> for ContextUpdate {
    fn from(classification: Classification) -> Self {
        Self {
            is_code_request: Some(classification.is_code_request()),
            user_request: Some(classification.sanitized_request),
            ..Self::default()
        }
    }
}

/// What `invoke` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Empty for non-coding turns.
    pub final_code: String,
    /// Always populated.
    pub reply: String,
    /// Intermediate design specification; empty for non-coding turns.
    pub plan: String,
    pub is_code_request: bool,
    /// Input history with this run's user and assistant turns appended.
    pub messages: Vec<ConversationTurn>,
    pub run_id: PipelineRunId,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub token_usage: TokenUsage,
}
