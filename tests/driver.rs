//! Integration tests for the conversion driver.
//!
//! These run the full batch loop against temporary directories with a
//! scripted in-process completion client — no network, no credentials.
//! The HTTP client itself is covered by its own unit tests; everything else
//! (skip guard, cleaning threshold, failure continuation, tally invariant,
//! mirrored layout) is exercised here.

use async_trait::async_trait;
use cmd2slash::{
    convert_dir, ChatCompletion, ConversionConfig, Cmd2SlashError, FileError, FileOutcome,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Scripted clients ─────────────────────────────────────────────────────────

/// Returns a fixed reply for every call and records what it was asked.
struct ScriptedClient {
    reply: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompletion for ScriptedClient {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(user.to_string());
        Ok(self.reply.clone())
    }
}

/// Fails whenever the prompt contains `marker`, succeeds otherwise.
struct FlakyClient {
    marker: String,
    calls: AtomicUsize,
}

#[async_trait]
impl ChatCompletion for FlakyClient {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if user.contains(&self.marker) {
            Err("request timed out".to_string())
        } else {
            Ok("converted();".to_string())
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn test_config(client: Arc<dyn ChatCompletion>) -> ConversionConfig {
    ConversionConfig::builder()
        .client(client)
        .request_delay_ms(0)
        .build()
        .unwrap()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// ── Scenarios from the driver's contract ─────────────────────────────────────

#[tokio::test]
async fn fresh_file_converted_existing_output_skipped() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write(src.path(), "a.js", "message.reply('pong'); // 50 chars of bot");
    write(src.path(), "b.js", "message.reply('hi');");
    write(out.path(), "b.js", "already converted, do not touch");

    let client = ScriptedClient::new("interaction.reply('pong');");
    let config = test_config(client.clone());

    let report = convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(report.summary.success, 1);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.summary.failed, 0);

    // a.js converted and written
    assert_eq!(
        fs::read_to_string(out.path().join("a.js")).unwrap(),
        "interaction.reply('pong');"
    );
    // b.js output untouched, and no API call was made for it
    assert_eq!(
        fs::read_to_string(out.path().join("b.js")).unwrap(),
        "already converted, do not touch"
    );
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn tally_always_matches_enumerated_files() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write(src.path(), "ok.js", "fine();");
    write(src.path(), "skipped.js", "fine();");
    write(out.path(), "skipped.js", "existing");
    write(src.path(), "fails.js", "BOOM marker here");
    write(src.path(), "notes.txt", "not enumerated");

    let client = Arc::new(FlakyClient {
        marker: "BOOM".to_string(),
        calls: AtomicUsize::new(0),
    });
    let config = test_config(client);

    let report = convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(report.files.len(), 3);
    assert_eq!(report.summary.total(), 3);
    assert_eq!(report.summary.success, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.skipped, 1);
}

#[tokio::test]
async fn oversized_file_is_cleaned_then_converted() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    // ~25k chars, of which ~6k are comments: the cleaned form fits the
    // 20k budget, so the file must be cleaned and converted, not failed.
    let code = "x".repeat(19_000);
    let comment = format!("// {}", "c".repeat(6_000));
    write(src.path(), "big.js", &format!("{code}\n{comment}\n"));

    let client = ScriptedClient::new("converted();");
    let config = test_config(client.clone());

    let report = convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(report.summary.success, 1);
    assert!(report.files[0].cleaned);
    assert_eq!(client.call_count(), 1);

    // The model saw the cleaned form: under budget, comments gone.
    let prompts = client.prompts.lock().unwrap();
    assert!(prompts[0].chars().count() <= 20_000);
    assert!(!prompts[0].contains("ccc"));
}

#[tokio::test]
async fn oversized_file_still_too_large_fails_without_api_call() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    // 25k chars of plain code: cleaning removes nothing, still over budget.
    write(src.path(), "huge.js", &"z".repeat(25_000));

    let client = ScriptedClient::new("never used");
    let config = test_config(client.clone());

    let report = convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(report.summary.failed, 1);
    assert!(matches!(
        report.files[0].error,
        Some(FileError::TooLarge { .. })
    ));
    assert_eq!(client.call_count(), 0);
    assert!(!out.path().join("huge.js").exists());
}

#[tokio::test]
async fn api_error_marks_file_failed_and_batch_continues() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    // Sorted enumeration: the failing file comes first.
    write(src.path(), "a_fails.js", "BOOM");
    write(src.path(), "b_ok.js", "fine();");

    let client = Arc::new(FlakyClient {
        marker: "BOOM".to_string(),
        calls: AtomicUsize::new(0),
    });
    let config = test_config(client.clone());

    let report = convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.success, 1);
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);

    let failed = &report.files[0];
    assert_eq!(failed.outcome, FileOutcome::Failed);
    match failed.error.as_ref().unwrap() {
        FileError::ApiFailed { detail, .. } => assert!(detail.contains("timed out")),
        other => panic!("expected ApiFailed, got {other:?}"),
    }

    assert!(out.path().join("b_ok.js").exists());
    assert!(!out.path().join("a_fails.js").exists());
}

#[tokio::test]
async fn reasoning_only_reply_is_an_empty_response_failure() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write(src.path(), "cmd.js", "fine();");

    let client = ScriptedClient::new("<think>no code produced</think>");
    let config = test_config(client);

    let report = convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(report.summary.failed, 1);
    assert!(matches!(
        report.files[0].error,
        Some(FileError::EmptyResponse { .. })
    ));
    assert!(!out.path().join("cmd.js").exists());
}

#[tokio::test]
async fn fenced_reply_is_written_without_the_fence() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write(src.path(), "cmd.js", "fine();");

    let client = ScriptedClient::new(
        "Here is the converted command:\n```js\ninteraction.reply('hi');\n```\nEnjoy!",
    );
    let config = test_config(client);

    convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("cmd.js")).unwrap(),
        "interaction.reply('hi');"
    );
}

#[tokio::test]
async fn output_mirrors_nested_source_layout() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write(src.path(), "commands/mod/ban.js", "fine();");
    write(src.path(), "commands/fun/eightball.js", "fine();");

    let client = ScriptedClient::new("converted();");
    let config = test_config(client);

    let report = convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(report.summary.success, 2);
    assert!(out.path().join("commands/mod/ban.js").exists());
    assert!(out.path().join("commands/fun/eightball.js").exists());
}

#[tokio::test]
async fn rerun_skips_written_outputs_and_retries_failures() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write(src.path(), "a_fails.js", "BOOM");
    write(src.path(), "b_ok.js", "fine();");

    let flaky = Arc::new(FlakyClient {
        marker: "BOOM".to_string(),
        calls: AtomicUsize::new(0),
    });
    let config = test_config(flaky);
    let first = convert_dir(src.path(), out.path(), &config).await.unwrap();
    assert_eq!(first.summary.failed, 1);

    // Second run with a healthy client: the previously failed file is
    // retried, the previously succeeded file is skipped untouched.
    let healthy = ScriptedClient::new("recovered();");
    let config = test_config(healthy.clone());
    let second = convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(second.summary.success, 1);
    assert_eq!(second.summary.skipped, 1);
    assert_eq!(second.summary.failed, 0);
    assert_eq!(healthy.call_count(), 1);
    assert_eq!(
        fs::read_to_string(out.path().join("a_fails.js")).unwrap(),
        "recovered();"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("b_ok.js")).unwrap(),
        "converted();"
    );
}

// ── Fatal startup conditions ─────────────────────────────────────────────────

#[tokio::test]
async fn missing_source_directory_is_fatal() {
    let out = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new("never");
    let config = test_config(client);

    let result = convert_dir("/no/such/source", out.path(), &config).await;
    assert!(matches!(
        result,
        Err(Cmd2SlashError::SourceDirMissing { .. })
    ));
}

#[tokio::test]
async fn empty_source_directory_yields_empty_report() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new("never");
    let config = test_config(client.clone());

    let report = convert_dir(src.path(), out.path(), &config).await.unwrap();

    assert_eq!(report.summary.total(), 0);
    assert!(report.files.is_empty());
    assert_eq!(client.call_count(), 0);
}
