//! Pipeline configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration. The defaults describe a single vision-capable model shared
//! by all nodes, with per-node token and temperature settings.
//!
//! ```toml
//! model = "Qwen/Qwen2.5-VL-7B-Instruct"
//!
//! [coder]
//! max_tokens = 6000
//! temperature = 0.1
//! repetition_penalty = 1.05
//! ```

use serde::{Deserialize, Serialize};

use crate::{ModelId, PipelineError};

/// Model used by every node unless a node overrides it.
pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-VL-7B-Instruct";

/// Call parameters for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Overrides [`PipelineConfig::model`] for this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelId>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
}

impl ModelSettings {
    /// Settings without a model override or repetition penalty.
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: None,
            max_tokens,
            temperature,
            repetition_penalty: None,
        }
    }

    /// The model this node calls, given the pipeline-wide default.
    pub fn resolve_model<'a>(&'a self, default: &'a ModelId) -> &'a ModelId {
        self.model.as_ref().unwrap_or(default)
    }

    fn validate(&self, node: &str) -> Result<(), PipelineError> {
        if self.max_tokens == 0 {
            return Err(PipelineError::configuration(format!(
                "{node}.max_tokens must be greater than zero"
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(PipelineError::configuration(format!(
                "{node}.temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }
        if let Some(penalty) = self.repetition_penalty {
            if !penalty.is_finite() || penalty <= 0.0 {
                return Err(PipelineError::configuration(format!(
                    "{node}.repetition_penalty must be positive, got {penalty}"
                )));
            }
        }
        if self.model.as_ref().is_some_and(ModelId::is_blank) {
            return Err(PipelineError::configuration(format!(
                "{node}.model must not be empty"
            )));
        }
        Ok(())
    }
}

/// Settings for a whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub model: ModelId,
    pub quick_responder: ModelSettings,
    pub planner: ModelSettings,
    pub coder: ModelSettings,
    pub reviewer: ModelSettings,
    pub responder: ModelSettings,
    /// Generated code shorter than this (in characters) skips review.
    pub review_min_chars: usize,
    /// How much of the plan the reviewer sees.
    pub reviewer_plan_chars: usize,
    /// How much of the plan the responder sees.
    pub responder_plan_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: ModelId::from_static(DEFAULT_MODEL),
            quick_responder: ModelSettings::new(300, 0.5),
            planner: ModelSettings::new(2000, 0.2),
            coder: ModelSettings::new(4000, 0.1),
            reviewer: ModelSettings::new(4000, 0.1),
            responder: ModelSettings::new(150, 0.7),
            review_min_chars: 100,
            reviewer_plan_chars: 1500,
            responder_plan_chars: 500,
        }
    }
}

impl PipelineConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml_str(source: &str) -> Result<Self, PipelineError> {
        let config: Self = toml::from_str(source)
            .map_err(|e| PipelineError::configuration(format!("invalid pipeline config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the pipeline-wide model.
    #[must_use]
    pub fn with_model(mut self, model: ModelId) -> Self {
        self.model = model;
        self
    }

    /// Rejects settings no endpoint would accept.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.model.is_blank() {
            return Err(PipelineError::configuration("model must not be empty"));
        }
        self.quick_responder.validate("quick_responder")?;
        self.planner.validate("planner")?;
        self.coder.validate("coder")?;
        self.reviewer.validate("reviewer")?;
        self.responder.validate("responder")?;
        Ok(())
    }
}
