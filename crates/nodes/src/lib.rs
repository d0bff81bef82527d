//! UI Forge pipeline node implementations and LLM gateway.
//!
//! This crate provides the five model-calling nodes (quick responder, planner,
//! coder, reviewer, responder), the [`LlmGateway`] through which every call is
//! made, the versioned prompt text in [`prompts`], and the
//! [`PipelineExecutor`] that sequences them.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Nodes sequence calls between business logic in the
//! [`pipeline`] crate (sanitisation, classification, cleanup) and the
//! [`pipeline::LlmProvider`] port. They contain no transport details.

pub mod coder;
pub mod executor;
pub mod gateway;
pub mod node;
pub mod planner;
pub mod prompts;
pub mod quick_responder;
pub mod responder;
pub mod reviewer;

pub use coder::Coder;
pub use executor::PipelineExecutor;
pub use gateway::LlmGateway;
pub use node::PipelineNode;
pub use planner::Planner;
pub use quick_responder::QuickResponder;
pub use responder::Responder;
pub use reviewer::Reviewer;
