//! Pipeline stages for prefix-to-slash conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. point at a different OpenAI-compatible server)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! enumerate ──▶ clean ──▶ llm ──▶ sanitize
//! (walk dir)   (budget)  (chat)  (extract code)
//! ```
//!
//! 1. [`enumerate`] — list eligible source files under the source root
//! 2. [`clean`]     — shrink oversized content under the character budget
//!    before it is sent to the completion service
//! 3. [`llm`]       — drive the chat-completion call; the only stage with
//!    network I/O
//! 4. [`sanitize`]  — extract the converted code from the raw model reply
//!    (reasoning sections, markdown fences)

pub mod clean;
pub mod enumerate;
pub mod llm;
pub mod sanitize;
