//! The conversion driver: enumerate once, then process files one at a time.
//!
//! ## Per-file state machine
//!
//! ```text
//! Pending ──▶ Skipped                      output already exists
//!    │
//!    ├──▶ Cleaning ──▶ Failed(TooLarge)    cleaned form still over budget
//!    │        │
//!    ▼        ▼
//! Converting ──▶ Failed(ApiFailed | EmptyResponse | WriteFailed)
//!    │
//!    └──▶ Written(Success)
//! ```
//!
//! Control flow is strictly linear: no parallelism, no queue, one request to
//! the completion service in flight at any time. After every file except the
//! last, the driver pauses for the configured delay — a fixed-rate throttle
//! against provider rate limits.
//!
//! Per-file failures never abort the batch. There is no retry within a run:
//! failed files produce no output, so re-running the tool re-attempts
//! exactly the failed set (the skip guard leaves succeeded files alone).

use crate::config::ConversionConfig;
use crate::error::{Cmd2SlashError, FileError};
use crate::pipeline::clean::clean_source;
use crate::pipeline::enumerate::enumerate_sources;
use crate::pipeline::llm::{ChatCompletion, HttpChatClient};
use crate::pipeline::sanitize::extract_code;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::report::{FileOutcome, FileReport, RunReport, RunSummary};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Convert every eligible file under `source`, mirroring results under
/// `output`.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(RunReport)` whenever the run itself could start, even if every file
/// failed (check `report.summary.failed`).
///
/// # Errors
/// Returns `Err(Cmd2SlashError)` only for fatal startup conditions:
/// - `source` is not an existing directory
/// - no API key is configured (and no client was injected)
/// - the output root cannot be created
pub async fn convert_dir(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<RunReport, Cmd2SlashError> {
    let run_start = Instant::now();
    let source = source.as_ref();
    let output = output.as_ref();

    if !source.is_dir() {
        return Err(Cmd2SlashError::SourceDirMissing {
            path: source.to_path_buf(),
        });
    }

    let client = resolve_client(config)?;

    tokio::fs::create_dir_all(output)
        .await
        .map_err(|e| Cmd2SlashError::OutputWriteFailed {
            path: output.to_path_buf(),
            source: e,
        })?;

    let files = enumerate_sources(source, &config.extension);
    let total = files.len();
    info!(
        "Converting {} .{} files from {} to {}",
        total,
        config.extension.trim_start_matches('.'),
        source.display(),
        output.display()
    );

    if let Some(ref cb) = config.progress {
        cb.on_run_start(total);
    }

    let mut reports: Vec<FileReport> = Vec::with_capacity(total);
    let mut summary = RunSummary::default();

    for (i, path) in files.iter().enumerate() {
        let index = i + 1;
        let report = process_file(&client, config, source, output, index, total, path).await;
        summary = summary.record(report.outcome);
        reports.push(report);

        // Fixed-rate throttle; skipped after the last file.
        if index < total && config.request_delay_ms > 0 {
            sleep(Duration::from_millis(config.request_delay_ms)).await;
        }
    }

    if let Some(ref cb) = config.progress {
        cb.on_run_complete(total, summary.success);
    }

    info!(
        "Run complete: {} success, {} failed, {} skipped ({} total)",
        summary.success,
        summary.failed,
        summary.skipped,
        summary.total()
    );

    Ok(RunReport {
        files: reports,
        summary,
        total_duration_ms: run_start.elapsed().as_millis() as u64,
    })
}

/// Synchronous wrapper around [`convert_dir`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_dir_sync(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<RunReport, Cmd2SlashError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Cmd2SlashError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert_dir(source, output, config))
}

/// Resolve the completion client, from most-specific to least-specific.
///
/// 1. **Pre-built client** (`config.client`) — the caller constructed the
///    client entirely; used as-is. This is how tests drive the batch loop
///    without a network.
/// 2. **HTTP client from config** — built once here from `base_url`,
///    `api_key` (falling back to `OPENAI_API_KEY`), and the model
///    parameters; owned by the driver for the lifetime of the run.
fn resolve_client(config: &ConversionConfig) -> Result<Arc<dyn ChatCompletion>, Cmd2SlashError> {
    if let Some(ref client) = config.client {
        return Ok(Arc::clone(client));
    }

    let client = HttpChatClient::new(
        &config.base_url,
        config.api_key.as_deref(),
        &config.model,
        config.temperature,
        config.max_tokens,
        config.api_timeout_secs,
    )?;
    Ok(Arc::new(client))
}

/// Run one file through the state machine.
///
/// Always returns a `FileReport` — per-file errors are recorded, never
/// propagated, so one bad file cannot abort the batch.
async fn process_file(
    client: &Arc<dyn ChatCompletion>,
    config: &ConversionConfig,
    source_root: &Path,
    output_root: &Path,
    index: usize,
    total: usize,
    path: &Path,
) -> FileReport {
    let start = Instant::now();
    let relative = path.strip_prefix(source_root).unwrap_or(path).to_path_buf();
    let out_path = output_root.join(&relative);

    // Idempotent guard: existing output is a hard skip, never an overwrite.
    if out_path.exists() {
        debug!("Skipping {} (output exists)", relative.display());
        if let Some(ref cb) = config.progress {
            cb.on_file_skipped(index, total, &relative);
        }
        return FileReport {
            relative_path: relative,
            outcome: FileOutcome::Skipped,
            cleaned: false,
            duration_ms: start.elapsed().as_millis() as u64,
            error: None,
        };
    }

    if let Some(ref cb) = config.progress {
        cb.on_file_start(index, total, &relative);
    }

    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) => {
            return fail(
                config,
                relative,
                false,
                start,
                index,
                total,
                FileError::ReadFailed {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                },
            );
        }
    };

    let over_budget = content.chars().count() > config.content_budget;
    let content = if over_budget {
        // Cleaning only; a file still over budget after cleaning is failed
        // rather than truncated, so the model never sees a mid-statement cut.
        let cleaned = clean_source(&content);
        let cleaned_chars = cleaned.chars().count();
        debug!(
            "Cleaned {}: {} chars (budget {})",
            relative.display(),
            cleaned_chars,
            config.content_budget
        );
        if cleaned_chars > config.content_budget {
            return fail(
                config,
                relative,
                true,
                start,
                index,
                total,
                FileError::TooLarge {
                    path: path.to_path_buf(),
                    cleaned_chars,
                    budget: config.content_budget,
                },
            );
        }
        cleaned
    } else {
        content
    };

    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    let raw_reply = match client.complete(system_prompt, &content).await {
        Ok(reply) => reply,
        Err(detail) => {
            warn!("API call failed for {}: {}", relative.display(), detail);
            return fail(
                config,
                relative,
                over_budget,
                start,
                index,
                total,
                FileError::ApiFailed {
                    path: path.to_path_buf(),
                    detail,
                },
            );
        }
    };

    let converted = match extract_code(&raw_reply) {
        Some(code) => code,
        None => {
            return fail(
                config,
                relative,
                over_budget,
                start,
                index,
                total,
                FileError::EmptyResponse {
                    path: path.to_path_buf(),
                },
            );
        }
    };

    if let Err(e) = write_output(&out_path, &converted).await {
        return fail(
            config,
            relative,
            over_budget,
            start,
            index,
            total,
            FileError::WriteFailed {
                path: out_path.clone(),
                detail: e.to_string(),
            },
        );
    }

    debug!(
        "Wrote {} ({} bytes, {}ms)",
        out_path.display(),
        converted.len(),
        start.elapsed().as_millis()
    );
    if let Some(ref cb) = config.progress {
        cb.on_file_complete(index, total, &relative, converted.len());
    }

    FileReport {
        relative_path: relative,
        outcome: FileOutcome::Success,
        cleaned: over_budget,
        duration_ms: start.elapsed().as_millis() as u64,
        error: None,
    }
}

/// Create intermediate directories (idempotent) and write the whole file.
async fn write_output(out_path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = out_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(out_path, content).await
}

/// Record a per-file failure and fire the progress event.
fn fail(
    config: &ConversionConfig,
    relative: std::path::PathBuf,
    cleaned: bool,
    start: Instant,
    index: usize,
    total: usize,
    error: FileError,
) -> FileReport {
    if let Some(ref cb) = config.progress {
        cb.on_file_error(index, total, &relative, &error.to_string());
    }
    FileReport {
        relative_path: relative,
        outcome: FileOutcome::Failed,
        cleaned,
        duration_ms: start.elapsed().as_millis() as u64,
        error: Some(error),
    }
}
