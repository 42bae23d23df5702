//! Vision backend implementations.

#[cfg(feature = "gemini")]
pub mod gemini;

use std::future::Future;

use serde_json::Value;

use crate::{Result, VisionRequest};

/// Trait for vision model clients.
///
/// A client performs exactly one request/response exchange per call and
/// returns the model's output parsed as JSON. It does not retry.
pub trait ExtractionClient: Send + Sync {
    /// Send the request and return the parsed JSON response.
    fn generate_json(&self, request: &VisionRequest) -> impl Future<Output = Result<Value>> + Send;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
