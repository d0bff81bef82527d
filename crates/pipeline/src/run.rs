//! Pipeline shapes and controller states.
//!
//! The classifier's verdict selects one of two fixed shapes. Each shape is an
//! ordered list of states the controller walks exactly once; there are no
//! cycles and no retries.
//!
//! ```text
//! Classifying ─┬─ general ──► NonCodeResponding ─────────────────────────────► Done
//!              └─ code ─────► Planning ► Coding ► Reviewing ► Responding ──► Done
//! ```

use serde::{Deserialize, Serialize};

use crate::classifier::Verdict;
use crate::NodeId;

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Classifying,
    NonCodeResponding,
    Planning,
    Coding,
    Reviewing,
    Responding,
    Done,
}

impl PipelineState {
    /// Name of the node that runs in this state, if any.
    pub fn node_name(self) -> Option<&'static str> {
        match self {
            Self::Classifying => Some("classifier"),
            Self::NonCodeResponding => Some("quick_responder"),
            Self::Planning => Some("planner"),
            Self::Coding => Some("coder"),
            Self::Reviewing => Some("reviewer"),
            Self::Responding => Some("responder"),
            Self::Done => None,
        }
    }

    /// [`NodeId`] of the node that runs in this state, if any.
    pub fn node_id(self) -> Option<NodeId> {
        self.node_name().map(NodeId::from_static)
    }

    /// The state that follows this one within `run`.
    pub fn next(self, run: PipelineRun) -> PipelineState {
        if self == Self::Classifying {
            return run.stages()[0];
        }
        let stages = run.stages();
        stages
            .iter()
            .position(|s| *s == self)
            .and_then(|i| stages.get(i + 1))
            .copied()
            .unwrap_or(Self::Done)
    }
}

/// The two shapes a run can take, chosen once by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineRun {
    /// Answer without generating code.
    QuickReply,
    /// Plan, generate, review, confirm.
    CodeGeneration,
}

impl PipelineRun {
    /// Picks the shape for a classifier verdict.
    pub fn for_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::CodeRequest => Self::CodeGeneration,
            Verdict::General => Self::QuickReply,
        }
    }

    /// States executed after classification, in order, ending before `Done`.
    pub fn stages(self) -> &'static [PipelineState] {
        match self {
            Self::QuickReply => &[PipelineState::NonCodeResponding],
            Self::CodeGeneration => &[
                PipelineState::Planning,
                PipelineState::Coding,
                PipelineState::Reviewing,
                PipelineState::Responding,
            ],
        }
    }
}
