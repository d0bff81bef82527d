//! Derives the design specification the coder implements.

use async_trait::async_trait;
use pipeline::{ChatMessage, ContextUpdate, LlmError, NodeId, PipelineContext};

use crate::gateway::LlmGateway;
use crate::node::PipelineNode;
use crate::prompts::{planner_user_message, PLANNER_SYSTEM_PROMPT};

/// Turns the request, and the image when present, into a prose design specification.
#[derive(Debug, Clone)]
pub struct Planner {
    gateway: LlmGateway,
}

impl Planner {
    pub fn new(gateway: LlmGateway) -> Self {
        Self { gateway }
    }

    /// One model call, vision-enabled when `image_url` is present.
    ///
    /// The returned text becomes the plan verbatim; an empty completion yields
    /// an empty plan. There are no retries on malformed output.
    pub async fn plan(
        &self,
        sanitized_request: &str,
        image_url: Option<&str>,
        current_code: Option<&str>,
    ) -> Result<ContextUpdate, LlmError> {
        let text = planner_user_message(sanitized_request, image_url.is_some(), current_code);
        let completion = self
            .gateway
            .complete(vec![
                ChatMessage::system(PLANNER_SYSTEM_PROMPT),
                ChatMessage::user_with_optional_image(text, image_url),
            ])
            .await?;

        let usage = completion.usage;
        let plan = completion.into_text();
        tracing::info!(plan_chars = plan.chars().count(), "plan drafted");
        Ok(ContextUpdate::plan(plan).with_usage(usage))
    }
}

#[async_trait]
impl PipelineNode for Planner {
    fn id(&self) -> &NodeId {
        self.gateway.node()
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<ContextUpdate, LlmError> {
        self.plan(&ctx.user_request, ctx.image_url(), ctx.current_code.as_deref())
            .await
    }
}
