//! Request types passed to vision backends.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// An image sent inline with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Mime type, e.g. `image/png`.
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl InlineImage {
    /// Encode raw image bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }
}

/// A single instruction + image exchange with a JSON response schema.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// Text instruction for the model.
    pub instruction: String,
    /// The image to analyze.
    pub image: InlineImage,
    /// Schema the JSON response must follow (OpenAPI subset).
    pub response_schema: Value,
}

impl VisionRequest {
    pub fn new(instruction: impl Into<String>, image: InlineImage, response_schema: Value) -> Self {
        Self {
            instruction: instruction.into(),
            image,
            response_schema,
        }
    }
}
