//! Prompt-injection redaction for user input.
//!
//! [`sanitize`] runs an ordered table of case-insensitive patterns over the
//! input, replacing every match with [`FILTERED`], then truncates the result to
//! [`MAX_INPUT_CHARS`] characters. Each pattern runs over the output of the one
//! before it. Input that matches nothing and fits the limit is returned
//! unchanged.
//!
//! Patterns carry no trailing anchors, and redaction is repeated after
//! truncation until the text is stable, so sanitising twice is the same as
//! sanitising once even at the length limit.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

/// Literal token substituted for every redacted span.
pub const FILTERED: &str = "[FILTERED]";

/// Maximum number of characters kept after redaction.
pub const MAX_INPUT_CHARS: usize = 2000;

/// Family of adversarial phrasing a redaction pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionCategory {
    /// "ignore all previous instructions" and friends.
    InstructionOverride,
    /// "stop following your instructions".
    NegatedCompliance,
    /// "you are now", "act as", "from now on".
    IdentityHijack,
    /// Attempts to read or replace the system prompt.
    PromptExfiltration,
    /// Chat-template markers and special tokens.
    DelimiterInjection,
    /// Named jailbreak modes.
    JailbreakTrigger,
}

/// Result of [`sanitize_with_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    /// The redacted, truncated text.
    pub text: String,
    /// Category of each pattern that fired, in table order, one entry per pattern.
    pub redactions: Vec<InjectionCategory>,
}

impl Sanitized {
    /// Returns `true` if any pattern fired.
    pub fn was_redacted(&self) -> bool {
        !self.redactions.is_empty()
    }
}

struct InjectionPattern {
    id: &'static str,
    pattern: Regex,
    category: InjectionCategory,
}

fn pattern(id: &'static str, category: InjectionCategory, source: &str) -> InjectionPattern {
    InjectionPattern {
        id,
        // Table entries are constants covered by the tests below.
        pattern: Regex::new(source).expect("injection pattern must compile"),
        category,
    }
}

static INJECTION_PATTERNS: LazyLock<Vec<InjectionPattern>> = LazyLock::new(|| {
    use InjectionCategory::*;
    vec![
        // 1. Instruction override
        pattern(
            "override_instructions",
            InstructionOverride,
            r"(?i)\b(?:ignore|disregard|forget|skip|bypass)\s+(?:(?:all|previous|above|prior|the|your|system)\s+)*instructions?",
        ),
        // 2. Negated compliance
        pattern(
            "stop_following",
            NegatedCompliance,
            r"(?i)\b(?:don'?t|stop)\s+follow(?:ing)?\s+(?:(?:the|your)\s+)?instructions?",
        ),
        // 3. Identity hijack
        pattern("you_are_now", IdentityHijack, r"(?i)\byou\s+are\s+now"),
        pattern(
            "pretend",
            IdentityHijack,
            r"(?i)\bpretend\s+(?:to\s+be|you'?re)",
        ),
        pattern("act_as", IdentityHijack, r"(?i)\b(?:act|roleplay)\s+as"),
        pattern("from_now_on", IdentityHijack, r"(?i)\bfrom\s+now\s+on"),
        // 4. System prompt exfiltration / override
        pattern(
            "new_instructions",
            PromptExfiltration,
            r"(?i)\bnew\s+(?:system\s+)?instructions?\s*:",
        ),
        pattern(
            "override_system",
            PromptExfiltration,
            r"(?i)\boverride\s+(?:system|instructions?|rules)",
        ),
        pattern("system_prompt_label", PromptExfiltration, r"(?i)\bsystem\s+prompt\s*:"),
        pattern(
            "reveal_prompt",
            PromptExfiltration,
            r"(?i)\b(?:reveal|show)\s+(?:(?:your|the)\s+)?(?:(?:system|initial)\s+)?prompt",
        ),
        pattern(
            "ask_instructions",
            PromptExfiltration,
            r"(?i)\bwhat(?:'s|\s+is|\s+are)\s+your\s+(?:(?:system|initial)\s+)?instructions?",
        ),
        // 5. Delimiter / token injection
        pattern(
            "bracket_markers",
            DelimiterInjection,
            r"(?i)\[SYSTEM\]|\[/?INST\]|<<SYS>>",
        ),
        pattern("double_curly", DelimiterInjection, r"\{\{.*?\}\}"),
        pattern("pipe_token", DelimiterInjection, r"<\|.*?\|>"),
        // 6. Named jailbreak triggers
        pattern(
            "jailbreak",
            JailbreakTrigger,
            r"(?i)\bDAN\s+mode|\bjailbreak(?:ing|s)?|\bdeveloper\s+mode",
        ),
    ]
});

/// Redacts injection phrasing and truncates to [`MAX_INPUT_CHARS`].
pub fn sanitize(input: &str) -> String {
    sanitize_with_report(input).text
}

/// Like [`sanitize`], also reporting which pattern categories fired.
pub fn sanitize_with_report(input: &str) -> Sanitized {
    let mut fired = vec![false; INJECTION_PATTERNS.len()];
    let mut text = truncate_chars(redact(input, &mut fired), MAX_INPUT_CHARS);

    // Truncation can cut a longer word down to a trigger, so redact until the
    // text is stable. Every change replaces user text with `FILTERED`, which
    // no pattern matches, so this terminates.
    loop {
        let next = truncate_chars(redact(&text, &mut fired), MAX_INPUT_CHARS);
        if next == text {
            break;
        }
        text = next;
    }

    let redactions = INJECTION_PATTERNS
        .iter()
        .zip(fired)
        .filter_map(|(entry, fired)| fired.then_some(entry.category))
        .collect();

    Sanitized { text, redactions }
}

/// One pass of the pattern table, marking each entry that matched.
fn redact(input: &str, fired: &mut [bool]) -> String {
    let mut text = input.to_owned();
    for (entry, fired) in INJECTION_PATTERNS.iter().zip(fired.iter_mut()) {
        if entry.pattern.is_match(&text) {
            tracing::debug!(pattern = entry.id, "redacting injection pattern");
            text = entry
                .pattern
                .replace_all(&text, NoExpand(FILTERED))
                .into_owned();
            *fired = true;
        }
    }
    text
}

fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max) {
        text.truncate(byte_index);
    }
    text
}
