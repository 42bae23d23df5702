//! Error types for the vision client layer.

use thiserror::Error;

/// Errors that can occur while talking to a vision model.
#[derive(Error, Debug)]
pub enum VisionError {
    /// The service credential is not available.
    #[error("{0} environment variable not set")]
    MissingCredentials(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[cfg(feature = "gemini")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The service answered but produced no text.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The model output is not valid JSON.
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
