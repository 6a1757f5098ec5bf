//! CLI binary for cmd2slash.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and prints per-file status lines plus a final summary.

use anyhow::{Context, Result};
use clap::Parser;
use cmd2slash::{
    convert_dir, ConversionConfig, ConversionProgressCallback, ProgressCallback, RunReport,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar anchored at the
/// bottom of the terminal and one log line per processed file. The driver is
/// sequential, so lines always arrive in file order.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_files} files…"))
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, relative_path: &Path) {
        self.bar.set_message(relative_path.display().to_string());
    }

    fn on_file_skipped(&self, index: usize, total: usize, relative_path: &Path) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            yellow("→"),
            index,
            total,
            relative_path.display(),
            dim("skipped (output exists)"),
        ));
        self.bar.inc(1);
    }

    fn on_file_complete(&self, index: usize, total: usize, relative_path: &Path, output_len: usize) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            relative_path.display(),
            dim(&format!("{output_len:>5} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, relative_path: &Path, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 100 {
            let cut: String = error.chars().take(99).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            relative_path.display(),
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, _total_files: usize, _success_count: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a command directory (credential from OPENAI_API_KEY)
  cmd2slash ./commands -o ./commands_slash

  # Use a specific model
  cmd2slash --model gpt-4o ./commands -o ./out

  # Point at a local OpenAI-compatible server (no rate limit: drop the delay)
  cmd2slash --base-url http://localhost:11434/v1 --api-key ollama \
            --delay-ms 0 ./commands -o ./out

  # TypeScript command modules, tighter budget
  cmd2slash --ext ts --budget 15000 ./src/commands -o ./out

  # Machine-readable run report
  cmd2slash --json ./commands -o ./out > report.json

RE-RUNNING:
  Existing output files are never overwritten. Failed files produce no
  output, so re-running the same command retries exactly the failed set.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY        Bearer credential for the completion service
  CMD2SLASH_MODEL       Override model ID
  CMD2SLASH_BASE_URL    Override endpoint base URL

SETUP:
  1. Set API key:   export OPENAI_API_KEY=sk-...
  2. Convert:       cmd2slash ./commands -o ./commands_slash
"#;

/// Convert prefix-command bot modules to slash commands using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "cmd2slash",
    version,
    about = "Convert prefix-command bot modules to slash commands using LLMs",
    long_about = "Walk a directory of prefix-command source files, send each file to an \
OpenAI-compatible chat-completion endpoint with a fixed conversion instruction, and write \
the converted slash-command modules to a mirrored output directory. Existing outputs are \
never overwritten.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source directory containing prefix-command modules.
    source: PathBuf,

    /// Output directory; converted files mirror the source layout.
    #[arg(short, long, env = "CMD2SLASH_OUTPUT")]
    output: PathBuf,

    /// Chat model ID (e.g. gpt-4o-mini, gpt-4o).
    #[arg(long, env = "CMD2SLASH_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(
        long,
        env = "CMD2SLASH_BASE_URL",
        default_value = "https://api.openai.com/v1",
        long_help = "Base URL of the completion endpoint. Any OpenAI-compatible server \
works: Ollama (http://localhost:11434/v1), vLLM, LiteLLM, LM Studio, …"
    )]
    base_url: String,

    /// Bearer credential; falls back to OPENAI_API_KEY.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Source-file extension to convert (without the dot).
    #[arg(long, env = "CMD2SLASH_EXT", default_value = "js")]
    ext: String,

    /// Character budget per file; larger files are cleaned, then failed.
    #[arg(long, env = "CMD2SLASH_BUDGET", default_value_t = 20_000)]
    budget: usize,

    /// Fixed pause between files in milliseconds (0 disables).
    #[arg(long, env = "CMD2SLASH_DELAY_MS", default_value_t = 1000)]
    delay_ms: u64,

    /// Max model output tokens per file.
    #[arg(long, env = "CMD2SLASH_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "CMD2SLASH_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Per-request timeout in seconds.
    #[arg(long, env = "CMD2SLASH_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "CMD2SLASH_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Print the run report as JSON to stdout.
    #[arg(long, env = "CMD2SLASH_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "CMD2SLASH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CMD2SLASH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CMD2SLASH_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli, show_progress).await?;

    // ── Run conversion ───────────────────────────────────────────────────
    let report = convert_dir(&cli.source, &cli.output, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    // Per-file failures are non-fatal: they are summarised here and the
    // process still exits 0. Re-running retries exactly the failed set.
    if !cli.quiet {
        print_summary(&report, &cli.output);
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
async fn build_config(cli: &Cli, show_progress: bool) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .model(&cli.model)
        .base_url(&cli.base_url)
        .extension(&cli.ext)
        .content_budget(cli.budget)
        .request_delay_ms(cli.delay_ms)
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {path:?}"))?;
        builder = builder.system_prompt(prompt);
    }

    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

/// Final run summary on stderr.
fn print_summary(report: &RunReport, output: &Path) {
    let s = &report.summary;
    let tick = if s.failed == 0 { green("✔") } else { cyan("⚠") };
    eprintln!(
        "{tick}  {} success  {} failed  {} skipped  ({} files, {:.1}s)  →  {}",
        bold(&s.success.to_string()),
        if s.failed > 0 {
            red(&s.failed.to_string())
        } else {
            s.failed.to_string()
        },
        dim(&s.skipped.to_string()),
        s.total(),
        report.total_duration_ms as f64 / 1000.0,
        bold(&output.display().to_string()),
    );

    for file in report.files.iter().filter(|f| f.error.is_some()) {
        if let Some(ref err) = file.error {
            eprintln!("   {} {}", red("✗"), err);
        }
    }
}
