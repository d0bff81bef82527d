//! Short-circuit answer for requests that need no code.

use async_trait::async_trait;
use pipeline::{ChatMessage, ContextUpdate, LlmError, NodeId, PipelineContext};

use crate::gateway::LlmGateway;
use crate::node::PipelineNode;
use crate::prompts::{
    quick_responder_user_message, QUICK_REPLY_FALLBACK, QUICK_RESPONDER_SYSTEM_PROMPT,
};

/// Answers general and capability questions within the UI scope.
#[derive(Debug, Clone)]
pub struct QuickResponder {
    gateway: LlmGateway,
}

impl QuickResponder {
    pub fn new(gateway: LlmGateway) -> Self {
        Self { gateway }
    }

    /// One model call; the update always carries an empty `final_code` and a non-empty reply.
    pub async fn quick_respond(&self, sanitized_request: &str) -> Result<ContextUpdate, LlmError> {
        let completion = self
            .gateway
            .complete(vec![
                ChatMessage::system(QUICK_RESPONDER_SYSTEM_PROMPT),
                ChatMessage::user(quick_responder_user_message(sanitized_request)),
            ])
            .await?;

        let usage = completion.usage;
        let reply = completion
            .non_blank_text()
            .map(|text| text.trim().to_owned())
            .unwrap_or_else(|| QUICK_REPLY_FALLBACK.to_owned());

        Ok(ContextUpdate::reply(reply)
            .and_final_code(String::new())
            .with_usage(usage))
    }
}

#[async_trait]
impl PipelineNode for QuickResponder {
    fn id(&self) -> &NodeId {
        self.gateway.node()
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<ContextUpdate, LlmError> {
        self.quick_respond(&ctx.user_request).await
    }
}
