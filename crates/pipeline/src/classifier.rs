//! Code-request classification.
//!
//! Decides whether a request should go through the generation nodes or be
//! answered by the quick responder. The decision is a pure function of the
//! sanitised text and whether an image was supplied; no model is consulted.
//!
//! Policy, first match wins:
//!
//! 1. An attached image is always a code request.
//! 2. A capability question without action intent is not.
//! 3. A coding-action phrase is.
//! 4. Anything else is not.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sanitizer::{sanitize_with_report, InjectionCategory};

/// Whether the request needs generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Run planner, coder, reviewer and responder.
    CodeRequest,
    /// Answer with the quick responder only.
    General,
}

/// Which rule of the policy produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationReason {
    ImageAttached,
    CapabilityQuestion,
    CodingAction,
    Unrecognised,
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The sanitised request; this is what downstream prompts see.
    pub sanitized_request: String,
    pub verdict: Verdict,
    pub reason: ClassificationReason,
    /// Injection categories the sanitiser redacted.
    pub redactions: Vec<InjectionCategory>,
}

impl Classification {
    /// Returns `true` for [`Verdict::CodeRequest`].
    pub fn is_code_request(&self) -> bool {
        self.verdict == Verdict::CodeRequest
    }

    /// Returns `true` if the sanitiser redacted anything.
    pub fn injection_detected(&self) -> bool {
        !self.redactions.is_empty()
    }
}

fn compile_all(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|source| Regex::new(source).expect("classifier pattern must compile"))
        .collect()
}

static CAPABILITY_QUESTION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"^(can|could|do|does|are|is|will|would) (you|this|it|ui forge)",
        r"^what (can|do|does|are|is) (you|this|it)",
        r"^how (do|does|can|could) (you|this|it)",
        r"^tell me (about|what)",
        r"^(who|what) (are|is) (you|this|ui forge)",
        r"\?$",
    ])
});

static ACTION_INTENT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"\b(build|create|generate|make|code|design|convert|turn|implement)\b.*\b(for me|this|a |an |the )",
        r"\b(i need|i want|please|give me|show me)\b",
    ])
});

static CODING_ACTION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"\b(build|create|generate|make|code|design|implement)\s+(me\s+)?(a|an|the|this)?\s*\w+",
        r"\b(convert|turn|transform)\s+.*(to|into)\s*(html|code|tailwind)",
        r"\b(add|change|update|modify|fix|refactor)\s+(the|a|this)?\s*\w+",
        r"\bcode\s+this\b",
    ])
});

fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|p| p.is_match(text))
}

/// Decides the verdict for an already-sanitised request.
///
/// Exposed separately so the decision boundary can be tested on exact strings.
pub fn decide(request: &str, has_image: bool) -> (Verdict, ClassificationReason) {
    if has_image {
        return (Verdict::CodeRequest, ClassificationReason::ImageAttached);
    }

    let lower = request.trim().to_lowercase();

    if any_match(&CAPABILITY_QUESTION, &lower) && !any_match(&ACTION_INTENT, &lower) {
        return (Verdict::General, ClassificationReason::CapabilityQuestion);
    }

    if any_match(&CODING_ACTION, &lower) {
        return (Verdict::CodeRequest, ClassificationReason::CodingAction);
    }

    (Verdict::General, ClassificationReason::Unrecognised)
}

/// Sanitises `request` and classifies the result.
pub fn classify(request: &str, has_image: bool) -> Classification {
    let sanitized = sanitize_with_report(request);
    let (verdict, reason) = decide(&sanitized.text, has_image);

    if sanitized.was_redacted() {
        tracing::warn!(
            categories = ?sanitized.redactions,
            "prompt injection phrasing redacted from request"
        );
    }
    tracing::info!(?verdict, ?reason, has_image, "request classified");

    Classification {
        sanitized_request: sanitized.text,
        verdict,
        reason,
        redactions: sanitized.redactions,
    }
}
