//! Error types for the cmd2slash library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Cmd2SlashError`] — **Fatal**: the run cannot start at all (missing
//!   API key, missing source directory, broken configuration). Returned as
//!   `Err(Cmd2SlashError)` from the top-level `convert_dir*` functions.
//!
//! * [`FileError`] — **Non-fatal**: a single file failed (oversized after
//!   cleaning, API error, empty reply) but the rest of the batch is fine.
//!   Stored inside [`crate::report::FileReport`] so callers can inspect
//!   partial success rather than losing the whole run to one bad file.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! file failure, log and continue, or collect all errors for a post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the cmd2slash library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::report::FileReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Cmd2SlashError {
    /// The source directory does not exist or is not a directory.
    #[error("Source directory not found: '{path}'\nCheck the path exists and is a directory.")]
    SourceDirMissing { path: PathBuf },

    /// No API key was provided and none was found in the environment.
    #[error("No API key configured.\n{hint}")]
    MissingApiKey { hint: String },

    /// The HTTP client for the completion service could not be built.
    #[error("Failed to build completion-service client: {detail}")]
    ClientBuildFailed { detail: String },

    /// Could not create or write under the output directory.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single source file.
///
/// Stored in [`crate::report::FileReport`] when a file fails. The batch
/// always continues with the next file.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The source file could not be read.
    #[error("'{path}': read failed: {detail}")]
    ReadFailed { path: PathBuf, detail: String },

    /// Even after cleaning, the content exceeds the character budget.
    /// No API call is made for such a file.
    #[error("'{path}': file too large ({cleaned_chars} chars after cleaning, budget {budget})")]
    TooLarge {
        path: PathBuf,
        cleaned_chars: usize,
        budget: usize,
    },

    /// The completion service call failed (network, HTTP status, timeout,
    /// authentication, or a malformed response body).
    #[error("'{path}': API call failed: {detail}")]
    ApiFailed { path: PathBuf, detail: String },

    /// The sanitised reply was empty or whitespace-only.
    #[error("'{path}': completion service returned no usable content")]
    EmptyResponse { path: PathBuf },

    /// The converted content could not be written to the output path.
    #[error("'{path}': write failed: {detail}")]
    WriteFailed { path: PathBuf, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_dir_missing_display() {
        let e = Cmd2SlashError::SourceDirMissing {
            path: PathBuf::from("/no/such/dir"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/no/such/dir"), "got: {msg}");
    }

    #[test]
    fn missing_api_key_display() {
        let e = Cmd2SlashError::MissingApiKey {
            hint: "Set OPENAI_API_KEY or pass --api-key.".into(),
        };
        assert!(e.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn too_large_display() {
        let e = FileError::TooLarge {
            path: PathBuf::from("commands/ping.js"),
            cleaned_chars: 22_000,
            budget: 20_000,
        };
        let msg = e.to_string();
        assert!(msg.contains("too large"));
        assert!(msg.contains("22000"));
        assert!(msg.contains("20000"));
    }

    #[test]
    fn api_failed_display() {
        let e = FileError::ApiFailed {
            path: PathBuf::from("commands/ban.js"),
            detail: "request timed out".into(),
        };
        assert!(e.to_string().contains("request timed out"));
        assert!(e.to_string().contains("ban.js"));
    }

    #[test]
    fn empty_response_display() {
        let e = FileError::EmptyResponse {
            path: PathBuf::from("commands/kick.js"),
        };
        assert!(e.to_string().contains("no usable content"));
    }
}
