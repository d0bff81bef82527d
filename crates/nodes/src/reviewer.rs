//! Validates and repairs the coder's output.

use async_trait::async_trait;
use pipeline::cleaning::{clean_reviewed_markup, contains_doctype};
use pipeline::{ChatMessage, ContextUpdate, LlmError, NodeId, PipelineContext};

use crate::gateway::LlmGateway;
use crate::node::PipelineNode;
use crate::prompts::{excerpt, reviewer_user_message, REVIEWER_SYSTEM_PROMPT};

/// Checks generated markup against a fixed checklist and fixes what it can.
///
/// Never returns something worse than its input: a repair without a
/// document-type declaration is discarded in favour of the original.
#[derive(Debug, Clone)]
pub struct Reviewer {
    gateway: LlmGateway,
    min_chars: usize,
    plan_chars: usize,
}

impl Reviewer {
    /// `min_chars`: shorter code is passed through without a call.
    /// `plan_chars`: how much of the plan goes into the prompt.
    pub fn new(gateway: LlmGateway, min_chars: usize, plan_chars: usize) -> Self {
        Self {
            gateway,
            min_chars,
            plan_chars,
        }
    }

    pub async fn review(
        &self,
        final_code: &str,
        plan: &str,
        image_url: Option<&str>,
    ) -> Result<ContextUpdate, LlmError> {
        let code_chars = final_code.trim().chars().count();
        if code_chars < self.min_chars {
            tracing::info!(code_chars, "skipping review of empty or truncated output");
            return Ok(ContextUpdate::final_code(final_code));
        }

        let text = reviewer_user_message(excerpt(plan, self.plan_chars), final_code);
        let completion = self
            .gateway
            .complete(vec![
                ChatMessage::system(REVIEWER_SYSTEM_PROMPT),
                ChatMessage::user_with_optional_image(text, image_url),
            ])
            .await?;

        let usage = completion.usage;
        let reviewed = clean_reviewed_markup(&completion.into_text());

        if !contains_doctype(&reviewed) {
            tracing::warn!(
                reviewed_chars = reviewed.chars().count(),
                "review produced no HTML document; keeping the unreviewed code"
            );
            return Ok(ContextUpdate::final_code(final_code).with_usage(usage));
        }

        tracing::info!(
            before_chars = code_chars,
            after_chars = reviewed.chars().count(),
            "review accepted"
        );
        Ok(ContextUpdate::final_code(reviewed).with_usage(usage))
    }
}

#[async_trait]
impl PipelineNode for Reviewer {
    fn id(&self) -> &NodeId {
        self.gateway.node()
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<ContextUpdate, LlmError> {
        self.review(&ctx.final_code, &ctx.plan, ctx.image_url()).await
    }
}
