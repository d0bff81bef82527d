//! The interface the controller drives.

use async_trait::async_trait;
use pipeline::{ContextUpdate, LlmError, NodeId, PipelineContext};

/// One stage of the pipeline.
///
/// A node reads the context, performs at most one model call, and returns an
/// update naming only the fields it owns. It never mutates the context itself.
#[async_trait]
pub trait PipelineNode: Send + Sync {
    fn id(&self) -> &NodeId;

    async fn run(&self, ctx: &PipelineContext) -> Result<ContextUpdate, LlmError>;
}
