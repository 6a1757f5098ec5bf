//! Configuration types for a conversion run.
//!
//! All run behaviour is controlled through [`ConversionConfig`], built via
//! its [`ConversionConfigBuilder`]. Keeping every knob in one immutable
//! struct, constructed once at startup and passed to the components that
//! need it, makes runs reproducible and easy to diff.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely
//! on well-documented defaults for the rest.

use crate::error::Cmd2SlashError;
use crate::pipeline::llm::ChatCompletion;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for a batch conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use cmd2slash::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .model("gpt-4o-mini")
///     .content_budget(20_000)
///     .request_delay_ms(1500)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Chat model identifier, e.g. "gpt-4o-mini". Default: "gpt-4o-mini".
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint. Default:
    /// "https://api.openai.com/v1".
    ///
    /// Any compatible local or third-party server (Ollama, vLLM, LiteLLM,
    /// LM Studio) may be substituted by changing this URL.
    pub base_url: String,

    /// Bearer credential for the completion service.
    ///
    /// When `None`, `OPENAI_API_KEY` is read at client construction.
    /// A missing or empty credential is a fatal startup error — no files
    /// are processed without one.
    pub api_key: Option<String>,

    /// Sampling temperature. Default: 0.2.
    ///
    /// Low temperature keeps the model faithful to the input module —
    /// exactly what you want for a mechanical code conversion. Higher
    /// values introduce creativity that worsens behaviour preservation.
    pub temperature: f32,

    /// Maximum tokens the model may generate per file. Default: 4096.
    ///
    /// Setting this too low silently truncates the converted module
    /// mid-statement. 4096 covers typical command modules comfortably.
    pub max_tokens: usize,

    /// Maximum character count sent to the completion service. Default: 20 000.
    ///
    /// Files over this budget go through the cleaning transform; files whose
    /// cleaned form is still over budget are marked failed without an API
    /// call. Controls request cost and avoids request-size failures.
    pub content_budget: usize,

    /// Fixed pause between consecutive files, in milliseconds. Default: 1000.
    ///
    /// A simple fixed-rate throttle against provider rate limits, not
    /// adaptive backoff. 0 disables the pause. The pause is never taken
    /// after the last file.
    pub request_delay_ms: u64,

    /// Source-file extension filter, without the leading dot. Default: "js".
    pub extension: String,

    /// Per-request timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Custom system prompt. If None, uses the built-in conversion
    /// instruction from [`crate::prompts`].
    pub system_prompt: Option<String>,

    /// Pre-constructed completion client. Takes precedence over
    /// `base_url`/`api_key`. This is the test seam: inject a scripted
    /// implementation to run the driver without a network.
    pub client: Option<Arc<dyn ChatCompletion>>,

    /// Progress callback receiving per-file events. Default: none.
    pub progress: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 4096,
            content_budget: 20_000,
            request_delay_ms: 1000,
            extension: "js".to_string(),
            api_timeout_secs: 60,
            system_prompt: None,
            client: None,
            progress: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("content_budget", &self.content_budget)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("extension", &self.extension)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("client", &self.client.as_ref().map(|_| "<dyn ChatCompletion>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn content_budget(mut self, chars: usize) -> Self {
        self.config.content_budget = chars;
        self
    }

    pub fn request_delay_ms(mut self, ms: u64) -> Self {
        self.config.request_delay_ms = ms;
        self
    }

    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.config.extension = ext.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn client(mut self, client: Arc<dyn ChatCompletion>) -> Self {
        self.config.client = Some(client);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Cmd2SlashError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(Cmd2SlashError::InvalidConfig(
                "Model name must not be empty".into(),
            ));
        }
        if c.base_url.trim().is_empty() {
            return Err(Cmd2SlashError::InvalidConfig(
                "Base URL must not be empty".into(),
            ));
        }
        if c.content_budget == 0 {
            return Err(Cmd2SlashError::InvalidConfig(
                "Content budget must be ≥ 1 character".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(Cmd2SlashError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.extension.trim_start_matches('.').is_empty() {
            return Err(Cmd2SlashError::InvalidConfig(
                "Extension filter must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
