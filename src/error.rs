//! Error types for this crate.
//!
//! All fallible operations return [`Result<T>`] which uses [`PipelineError`] as the error type.

use std::time::Duration;
use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`PipelineError`] as the error type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The unified error type for all crate errors.
///
/// Setup variants (`Download`, `Device`, `Config`) are fatal at startup.
/// Per-clause variants (`Classification`, `Timeout`) are absorbed by the
/// aggregator, which counts the clause as neutral and moves on.
///
/// # Example
///
/// ```rust,no_run
/// use sentiment_breakdown::error::PipelineError;
///
/// fn handle_error(e: PipelineError) {
///     match &e {
///         PipelineError::Download(_) => {
///             // Network issue - retry with backoff
///         }
///         PipelineError::Device(_) => {
///             // GPU unavailable - fall back to CPU
///         }
///         PipelineError::Classification(_) | PipelineError::Timeout(_) => {
///             // One clause lost - the rest of the statement still counts
///         }
///         PipelineError::EmptyInput => {
///             // Nothing to analyze - ask for a statement
///         }
///         _ => {
///             eprintln!("error: {e}");
///         }
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// Network or download failure. Retry may help.
    #[error("{0}")]
    Download(String),

    /// Tokenizer could not be loaded or failed on the input text.
    #[error("{0}")]
    Tokenization(String),

    /// Device initialization failure. Fall back to CPU.
    #[error("{0}")]
    Device(String),

    /// The classifier could not produce a label for one clause.
    #[error("{0}")]
    Classification(String),

    /// The classifier did not answer within the per-clause limit.
    #[error("classification timed out after {0:?}")]
    Timeout(Duration),

    /// The statement contained no clauses.
    #[error("Please enter a statement to analyze.")]
    EmptyInput,

    /// Invalid settings file or option value.
    #[error("{0}")]
    Config(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl From<hf_hub::api::sync::ApiError> for PipelineError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        PipelineError::Download(format!("HuggingFace API error: {}", value))
    }
}

impl From<candle_core::Error> for PipelineError {
    fn from(value: candle_core::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<minijinja::Error> for PipelineError {
    fn from(value: minijinja::Error) -> Self {
        PipelineError::Unexpected(format!("Page rendering failed: {}", value))
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(value: toml::de::Error) -> Self {
        PipelineError::Config(format!("Invalid settings file: {}", value))
    }
}
