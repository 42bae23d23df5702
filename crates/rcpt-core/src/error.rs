//! Error types for the rcpt-core library.

use thiserror::Error;

/// Main error type for the rcpt library.
///
/// Every variant renders as a message fit to show the user directly.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The image file could not be read into memory.
    #[error("Failed to read file: {0}")]
    FileRead(#[source] std::io::Error),

    /// The bytes are not a PNG, JPEG or GIF image, or the data URL is malformed.
    #[error("Invalid image data: {0}")]
    InvalidImagePayload(String),

    /// The vision service call failed.
    #[error("Failed to extract receipt information: {0}")]
    ExtractionClient(#[from] rcpt_vision::VisionError),

    /// The service answered, but a field is missing or has the wrong type.
    #[error("Failed to extract receipt information: AI response did not match the expected format.")]
    MalformedExtraction {
        /// The first offending field.
        field: &'static str,
    },

    /// Anything that is not one of the kinds above.
    #[error("An unknown error occurred during processing.")]
    Unknown,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, ScanError>;
