//! Writes the confirmation shown to the user after generation.

use async_trait::async_trait;
use pipeline::{ChatMessage, ContextUpdate, LlmError, NodeId, PipelineContext};

use crate::gateway::LlmGateway;
use crate::node::PipelineNode;
use crate::prompts::{
    excerpt, responder_user_message, RESPONDER_FALLBACK, RESPONDER_SYSTEM_PROMPT,
};

#[derive(Debug, Clone)]
pub struct Responder {
    gateway: LlmGateway,
    plan_chars: usize,
}

impl Responder {
    pub fn new(gateway: LlmGateway, plan_chars: usize) -> Self {
        Self {
            gateway,
            plan_chars,
        }
    }

    /// One model call producing a short, non-technical confirmation.
    ///
    /// Treated as an update when `current_code` holds anything besides whitespace.
    pub async fn respond(
        &self,
        user_request: &str,
        plan: &str,
        current_code: Option<&str>,
    ) -> Result<ContextUpdate, LlmError> {
        let is_update = current_code.is_some_and(|code| !code.trim().is_empty());
        let completion = self
            .gateway
            .complete(vec![
                ChatMessage::system(RESPONDER_SYSTEM_PROMPT),
                ChatMessage::user(responder_user_message(
                    user_request,
                    excerpt(plan, self.plan_chars),
                    is_update,
                )),
            ])
            .await?;

        let usage = completion.usage;
        let reply = completion
            .non_blank_text()
            .map(|text| text.trim().to_owned())
            .unwrap_or_else(|| RESPONDER_FALLBACK.to_owned());

        Ok(ContextUpdate::reply(reply).with_usage(usage))
    }
}

#[async_trait]
impl PipelineNode for Responder {
    fn id(&self) -> &NodeId {
        self.gateway.node()
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<ContextUpdate, LlmError> {
        self.respond(&ctx.user_request, &ctx.plan, ctx.current_code.as_deref())
            .await
    }
}
