//! The single path every node takes to reach a model.
//!
//! An [`LlmGateway`] binds a provider to one node's resolved model and call
//! settings, turns message lists into [`CompletionRequest`]s, and emits the
//! per-call tracing events. It never retries and never swallows errors.

use std::sync::Arc;

use pipeline::{
    ChatMessage, Completion, CompletionRequest, LlmError, LlmProvider, ModelId, ModelSettings,
    NodeId,
};

/// A provider bound to one node's settings.
#[derive(Clone)]
pub struct LlmGateway {
    provider: Arc<dyn LlmProvider>,
    node: NodeId,
    model: ModelId,
    settings: ModelSettings,
}

impl LlmGateway {
    /// Binds `provider` to `node`, resolving the node's model against `default_model`.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        node: NodeId,
        default_model: &ModelId,
        settings: &ModelSettings,
    ) -> Self {
        Self {
            provider,
            model: settings.resolve_model(default_model).clone(),
            node,
            settings: settings.clone(),
        }
    }

    pub fn node(&self) -> &NodeId {
        &self.node
    }

    /// Runs one completion with this node's settings.
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Completion, LlmError> {
        let vision = messages.iter().any(|m| m.content.has_image());
        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            repetition_penalty: self.settings.repetition_penalty,
        };

        tracing::debug!(
            node = %self.node,
            model = %self.model,
            vision,
            max_tokens = request.max_tokens,
            "calling model"
        );

        let completion = self.provider.complete(request).await?;

        if let Some(usage) = completion.usage {
            tracing::debug!(
                node = %self.node,
                prompt_tokens = usage.prompt.as_u64(),
                completion_tokens = usage.completion.as_u64(),
                "model call finished"
            );
        }
        if completion.text.as_deref().map_or(true, |t| t.trim().is_empty()) {
            tracing::warn!(node = %self.node, "model returned no content");
        }

        Ok(completion)
    }
}

impl std::fmt::Debug for LlmGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGateway")
            .field("node", &self.node)
            .field("model", &self.model)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
