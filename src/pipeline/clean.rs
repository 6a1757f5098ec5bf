//! Content cleaning: shrink oversized source text under the character budget.
//!
//! A file whose content exceeds the budget cannot be sent to the completion
//! service as-is (request-size failures, runaway cost). This module applies
//! cheap, lossy passes that remove the parts a conversion model does not
//! need — comments and blank space — and hard-truncates as a last resort.
//!
//! ## Passes (applied in order)
//!
//! 1. Strip `//` line comments
//! 2. Strip non-nested `/* ... */` block comments (minimal match)
//! 3. Collapse runs of blank lines
//! 4. Trim leading/trailing whitespace on every line
//! 5. Remove now-empty lines
//! 6. Hard-truncate to the budget if still over (no semantic boundary)
//!
//! [`clean_source`] is passes 1–5; the driver uses it and marks a file that
//! is still over budget as failed rather than truncating, so the model never
//! sees a mid-statement cut. [`shrink_to_budget`] is the full transform
//! including the truncation fallback, identity on input already within the
//! budget, and idempotent.
//!
//! Known limitation, preserved deliberately: the comment stripping is
//! text-level, so a `//` inside a string or template literal is treated as a
//! comment and the remainder of that line is lost.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\n]*").unwrap());
static RE_BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Apply the comment/whitespace reduction passes (1–5) unconditionally.
///
/// Pure text-level heuristic; does not guarantee syntactic validity of the
/// result.
pub fn clean_source(text: &str) -> String {
    let s = strip_line_comments(text);
    let s = strip_block_comments(&s);
    let s = collapse_blank_runs(&s);
    let s = trim_lines(&s);
    drop_empty_lines(&s)
}

/// Reduce `text` to at most `budget` characters.
///
/// Identity for input already within the budget; otherwise [`clean_source`]
/// followed by hard truncation when cleaning alone is not enough. Lengths
/// are counted in `char`s (the budget is a character count), so the
/// truncation is always UTF-8 safe.
pub fn shrink_to_budget(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    truncate_chars(&clean_source(text), budget)
}

// ── Pass 1: line comments ────────────────────────────────────────────────

fn strip_line_comments(input: &str) -> String {
    RE_LINE_COMMENT.replace_all(input, "").to_string()
}

// ── Pass 2: block comments ───────────────────────────────────────────────

fn strip_block_comments(input: &str) -> String {
    RE_BLOCK_COMMENT.replace_all(input, "").to_string()
}

// ── Pass 3: blank-line runs ──────────────────────────────────────────────

fn collapse_blank_runs(input: &str) -> String {
    RE_BLANK_RUN.replace_all(input, "\n\n").to_string()
}

// ── Passes 4 + 5: trim and drop empties ──────────────────────────────────

fn trim_lines(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

fn drop_empty_lines(input: &str) -> String {
    input
        .lines()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Pass 6: hard truncation ──────────────────────────────────────────────

fn truncate_chars(input: &str, budget: usize) -> String {
    match input.char_indices().nth(budget) {
        Some((byte_idx, _)) => input[..byte_idx].to_string(),
        None => input.to_string(),
    }
}
