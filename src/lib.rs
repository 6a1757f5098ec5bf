//! # cmd2slash
//!
//! Batch-convert prefix-command bot modules to slash commands using LLMs.
//!
//! ## Why this crate?
//!
//! Migrating a bot from text-triggered prefix commands (`!ban @user`) to
//! platform-native slash commands is mechanical but tedious: argument
//! parsing becomes typed options, message replies become interaction
//! replies, and every command module needs the same careful rewrite. A chat
//! model does that rewrite well; this crate drives it over a whole command
//! directory and mirrors the results, so a migration is one command instead
//! of an afternoon of copy-paste.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source dir
//!  │
//!  ├─ 1. Enumerate  recursive, extension-filtered, sorted listing
//!  ├─ 2. Skip       output already exists? never overwrite
//!  ├─ 3. Clean      shrink oversized files under the character budget
//!  ├─ 4. Convert    one chat-completion call per file, fixed delay between
//!  ├─ 5. Sanitize   strip reasoning sections / extract the first code fence
//!  └─ 6. Write      mirrored output path + success/failed/skipped tally
//! ```
//!
//! Processing is strictly sequential — one request in flight, a fixed pause
//! between files — because the external rate limit, not the CPU, is the
//! bottleneck.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmd2slash::{convert_dir, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from OPENAI_API_KEY
//!     let config = ConversionConfig::default();
//!     let report = convert_dir("commands", "commands_slash", &config).await?;
//!     eprintln!(
//!         "{} converted, {} failed, {} skipped",
//!         report.summary.success, report.summary.failed, report.summary.skipped
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cmd2slash` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! cmd2slash = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert_dir, convert_dir_sync};
pub use error::{Cmd2SlashError, FileError};
pub use pipeline::llm::{ChatCompletion, ChatMessage, HttpChatClient};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use report::{FileOutcome, FileReport, RunReport, RunSummary};
