//! The pipeline controller.
//!
//! [`PipelineExecutor::invoke`] classifies the request, picks the run shape,
//! then walks its states in order. Each node's update is folded into a new
//! context before the next node runs. The executor holds no per-run state, so
//! one instance serves any number of concurrent invocations.
//!
//! Dropping the future returned by `invoke` aborts the in-flight model call and
//! discards the context; nothing from a partial run reaches the caller.

use std::sync::Arc;

use pipeline::{
    classify, ChatRole, ContextUpdate, ConversationTurn, LlmProvider, ModelSettings,
    PipelineConfig, PipelineContext, PipelineError, PipelineInput, PipelineOutput, PipelineRun,
    PipelineRunId, PipelineState, Timestamp,
};
use tracing::Instrument;

use crate::coder::Coder;
use crate::gateway::LlmGateway;
use crate::node::PipelineNode;
use crate::planner::Planner;
use crate::prompts::PROMPT_VERSION;
use crate::quick_responder::QuickResponder;
use crate::responder::Responder;
use crate::reviewer::Reviewer;

/// Runs the classifier and the node sequence for one request at a time.
#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    quick_responder: QuickResponder,
    planner: Planner,
    coder: Coder,
    reviewer: Reviewer,
    responder: Responder,
}

impl PipelineExecutor {
    /// Builds every node against `provider`.
    ///
    /// Fails with [`PipelineError::Configuration`] before any node exists if
    /// `config` is invalid.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        config: &PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let gateway = |state: PipelineState, settings: &ModelSettings| {
            let node = state.node_id().ok_or_else(|| {
                PipelineError::configuration(format!("state {state:?} has no node"))
            })?;
            Ok::<_, PipelineError>(LlmGateway::new(
                Arc::clone(&provider),
                node,
                &config.model,
                settings,
            ))
        };

        Ok(Self {
            quick_responder: QuickResponder::new(gateway(
                PipelineState::NonCodeResponding,
                &config.quick_responder,
            )?),
            planner: Planner::new(gateway(PipelineState::Planning, &config.planner)?),
            coder: Coder::new(gateway(PipelineState::Coding, &config.coder)?),
            reviewer: Reviewer::new(
                gateway(PipelineState::Reviewing, &config.reviewer)?,
                config.review_min_chars,
                config.reviewer_plan_chars,
            ),
            responder: Responder::new(
                gateway(PipelineState::Responding, &config.responder)?,
                config.responder_plan_chars,
            ),
        })
    }

    /// Runs one invocation to completion.
    ///
    /// Either every node of the chosen branch completes, or the first model
    /// failure is returned and nothing else is.
    pub async fn invoke(&self, input: PipelineInput) -> Result<PipelineOutput, PipelineError> {
        let run_id = PipelineRunId::new_random();
        let span = tracing::info_span!(
            "pipeline_run",
            %run_id,
            has_image = input.image_url.is_some(),
            refinement = input.current_code.is_some(),
            prompt_version = PROMPT_VERSION,
        );
        self.execute(run_id, input).instrument(span).await
    }

    async fn execute(
        &self,
        run_id: PipelineRunId,
        input: PipelineInput,
    ) -> Result<PipelineOutput, PipelineError> {
        let started_at = Timestamp::now();
        let mut ctx = PipelineContext::new(input);

        let classification = classify(&ctx.user_request, ctx.has_image());
        let run = PipelineRun::for_verdict(classification.verdict);
        ctx = ctx.apply(classification.into());

        let mut state = PipelineState::Classifying.next(run);
        while let Some(node) = self.node_for(state) {
            let update = self.step(node, &ctx).await?;
            ctx = ctx.apply(update);
            state = state.next(run);
        }

        let turns = vec![
            ConversationTurn::now(ChatRole::User, ctx.user_request.clone()),
            ConversationTurn::now(ChatRole::Assistant, ctx.reply.clone()),
        ];
        ctx = ctx.apply(ContextUpdate::messages(turns));

        tracing::info!(
            ?run,
            code_chars = ctx.final_code.chars().count(),
            total_tokens = ctx.token_usage.total().as_u64(),
            "pipeline run finished"
        );

        Ok(ctx.into_output(run_id, started_at, Timestamp::now()))
    }

    async fn step(
        &self,
        node: &dyn PipelineNode,
        ctx: &PipelineContext,
    ) -> Result<ContextUpdate, PipelineError> {
        let span = tracing::info_span!("node", node = %node.id());
        node.run(ctx)
            .instrument(span)
            .await
            .map_err(|source| PipelineError::Llm {
                node: node.id().clone(),
                source,
            })
    }

    fn node_for(&self, state: PipelineState) -> Option<&dyn PipelineNode> {
        match state {
            PipelineState::NonCodeResponding => Some(&self.quick_responder),
            PipelineState::Planning => Some(&self.planner),
            PipelineState::Coding => Some(&self.coder),
            PipelineState::Reviewing => Some(&self.reviewer),
            PipelineState::Responding => Some(&self.responder),
            PipelineState::Classifying | PipelineState::Done => None,
        }
    }
}
