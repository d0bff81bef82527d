//! Generates the markup artifact from the plan.

use async_trait::async_trait;
use pipeline::cleaning::{clean_generated_markup, starts_with_doctype};
use pipeline::{ChatMessage, ContextUpdate, LlmError, NodeId, PipelineContext};

use crate::gateway::LlmGateway;
use crate::node::PipelineNode;
use crate::prompts::{coder_system_prompt, coder_user_message};

/// Writes a complete, self-contained HTML document following the plan.
#[derive(Debug, Clone)]
pub struct Coder {
    gateway: LlmGateway,
}

impl Coder {
    pub fn new(gateway: LlmGateway) -> Self {
        Self { gateway }
    }

    /// One model call, followed by fence and preamble cleanup.
    ///
    /// When the cleaned text has no document-type declaration it is still
    /// returned as the final code; the reviewer is the only later guard.
    pub async fn code(
        &self,
        plan: &str,
        image_url: Option<&str>,
    ) -> Result<ContextUpdate, LlmError> {
        let completion = self
            .gateway
            .complete(vec![
                ChatMessage::system(coder_system_prompt(plan)),
                ChatMessage::user_with_optional_image(
                    coder_user_message(image_url.is_some()),
                    image_url,
                ),
            ])
            .await?;

        let usage = completion.usage;
        let code = clean_generated_markup(&completion.into_text());

        if !code.is_empty() && !starts_with_doctype(&code) {
            tracing::warn!(
                code_chars = code.chars().count(),
                "generated output has no document type declaration; passing it through"
            );
        }

        Ok(ContextUpdate::final_code(code).with_usage(usage))
    }
}

#[async_trait]
impl PipelineNode for Coder {
    fn id(&self) -> &NodeId {
        self.gateway.node()
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<ContextUpdate, LlmError> {
        self.code(&ctx.plan, ctx.image_url()).await
    }
}
