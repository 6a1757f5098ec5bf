//! Response sanitising: extract the converted code from a raw model reply.
//!
//! Models disobey output instructions in two recurring ways:
//!
//! - Reasoning-tuned models prepend `<think>…</think>` sections despite the
//!   prompt asking for code only
//! - Models wrap the code in ` ``` ` fences, often with prose around the
//!   fence ("Here is the converted command:")
//!
//! Both are fixed here with cheap deterministic rules rather than in the
//! prompt, so the prompt stays focused on the conversion itself. A reply
//! that sanitises down to nothing is a conversion failure for that file,
//! signalled as `None`.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_REASONING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think(?:ing)?>.*?</think(?:ing)?>").unwrap());

static RE_FIRST_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_+.-]*[ \t]*\n(.*?)```").unwrap());

/// Extract the intended output from the completion service's raw reply.
///
/// Reasoning sections are removed first. If a fenced code block is present,
/// the trimmed inner content of the **first** fence is returned, regardless
/// of what precedes or follows it; otherwise the trimmed whole reply.
/// Returns `None` when the result is empty or whitespace-only.
pub fn extract_code(raw: &str) -> Option<String> {
    let without_reasoning = RE_REASONING.replace_all(raw, "");

    let extracted = match RE_FIRST_FENCE.captures(&without_reasoning) {
        Some(caps) => caps[1].trim().to_string(),
        None => without_reasoning.trim().to_string(),
    };

    if extracted.is_empty() {
        None
    } else {
        Some(extracted)
    }
}
