//! Vision model client abstraction for rcpt.
//!
//! This crate provides a single interface for asking a generative vision
//! model to turn an image plus an instruction into structured JSON:
//! - `ExtractionClient`, the trait the rest of the workspace programs against
//! - `GeminiClient`, an implementation over the Gemini `generateContent` API

mod backend;
mod error;
mod request;

pub use backend::ExtractionClient;
pub use error::VisionError;
pub use request::{InlineImage, VisionRequest};

#[cfg(feature = "gemini")]
pub use backend::gemini::{GeminiClient, GeminiConfig};

/// Result type for vision operations.
pub type Result<T> = std::result::Result<T, VisionError>;
