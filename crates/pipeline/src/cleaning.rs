//! Best-effort cleanup of generated markup.
//!
//! Model output often arrives wrapped in a markdown fence, prefixed with a
//! sentence of narration, or both. The transforms here are small and pure;
//! [`clean_generated_markup`] and [`clean_reviewed_markup`] chain them in the
//! order the coder and reviewer need. [`contains_doctype`] is the acceptance
//! predicate the reviewer uses to decide whether its output is usable.

use std::sync::LazyLock;

use regex::Regex;

/// Document-type declaration every generated artifact must start with.
pub const DOCTYPE: &str = "<!DOCTYPE html>";

const DOCTYPE_PREFIX: &str = "<!doctype";

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)```(?:html)?[ \t]*\r?\n?").expect("fence pattern must compile")
});

static NARRATIVE_PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:here\s+is|here's|below\s+is|the\s+(?:fixed|corrected|updated|enhanced|improved)|i've\s+(?:fixed|corrected|updated|enhanced|improved))[^\n<]*\n?",
    )
    .expect("preamble pattern must compile")
});

/// Removes every markdown code-fence marker (```` ```html ```` or bare ```` ``` ````).
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

/// Removes one leading line of narration such as "Here is the fixed code:".
///
/// Stops at the first `<` so a declaration on the same line survives.
pub fn strip_narrative_preamble(text: &str) -> String {
    NARRATIVE_PREAMBLE.replace(text, "").into_owned()
}

/// Returns `true` if `text` contains the declaration anywhere, in any case.
pub fn contains_doctype(text: &str) -> bool {
    find_doctype(text).is_some()
}

/// Returns `true` if `text` begins with the declaration, in any case.
pub fn starts_with_doctype(text: &str) -> bool {
    find_doctype(text) == Some(0)
}

fn find_doctype(text: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    text.to_ascii_lowercase().find(DOCTYPE_PREFIX)
}

/// Drops everything before the first declaration.
///
/// Text without a declaration is returned unchanged.
pub fn relocate_to_doctype(text: &str) -> &str {
    match find_doctype(text) {
        Some(index) => &text[index..],
        None => text,
    }
}

/// Coder cleanup: strip fences, trim, then drop any preamble before the declaration.
pub fn clean_generated_markup(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    relocate_to_doctype(unfenced.trim()).to_owned()
}

/// Reviewer cleanup: like [`clean_generated_markup`], also removing leading narration.
pub fn clean_reviewed_markup(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    let unnarrated = strip_narrative_preamble(&unfenced);
    relocate_to_doctype(unnarrated.trim()).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_markdown_code_blocks() {
        let result = clean_generated_markup("```html\n<!DOCTYPE html>\n<html></html>\n```");
        assert!(result.starts_with(DOCTYPE));
        assert!(!result.contains("```"));
        assert_eq!(result, "<!DOCTYPE html>\n<html></html>");
    }

    #[test]
    fn removes_bare_fences() {
        let result = clean_generated_markup("```\n<!DOCTYPE html><html></html>```");
        assert_eq!(result, "<!DOCTYPE html><html></html>");
    }

    #[test]
    fn extracts_code_after_preamble() {
        let result = clean_generated_markup("Here is the code:\n<!DOCTYPE html>\n<html></html>");
        assert_eq!(result, "<!DOCTYPE html>\n<html></html>");
    }

    #[test]
    fn clean_input_is_unchanged() {
        let input = "<!DOCTYPE html>\n<html></html>";
        assert_eq!(clean_generated_markup(input), input);
        assert_eq!(clean_generated_markup("  \n<!DOCTYPE html>\n<html></html>\n"), input);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean_generated_markup(""), "");
        assert_eq!(clean_reviewed_markup(""), "");
    }

    #[test]
    fn text_without_doctype_is_kept() {
        assert_eq!(clean_generated_markup("```\nsorry, no\n```"), "sorry, no");
    }

    #[test]
    fn lowercase_doctype_is_recognised() {
        assert!(starts_with_doctype("<!doctype html><html></html>"));
        assert_eq!(relocate_to_doctype("x <!doctype html>"), "<!doctype html>");
    }

    #[test]
    fn reviewer_cleanup_strips_narration() {
        let raw = "I've fixed the issues.\n```html\n<!DOCTYPE html>\n<html></html>\n```\n";
        assert_eq!(clean_reviewed_markup(raw), "<!DOCTYPE html>\n<html></html>");
        let same_line = "The corrected version: <!DOCTYPE html><html></html>";
        assert_eq!(clean_reviewed_markup(same_line), "<!DOCTYPE html><html></html>");
    }

    #[test]
    fn preamble_stripping_only_touches_the_start() {
        let text = "<p>Here is a paragraph</p>";
        assert_eq!(strip_narrative_preamble(text), text);
    }

    #[test]
    fn doctype_predicate() {
        assert!(contains_doctype("blah <!DOCTYPE html>"));
        assert!(!contains_doctype("<html></html>"));
    }
}
