//! Orchestration of a single extraction request.

use std::time::Instant;

use rcpt_vision::{ExtractionClient, InlineImage, VisionRequest};
use tracing::{debug, error, info};

use super::decode::decode_fields;
use super::prompt::{INSTRUCTION, response_schema};
use crate::error::Result;
use crate::models::receipt::ReceiptFields;
use crate::payload::ImagePayload;

/// Turns receipt images into receipt fields using a vision client.
///
/// Each call makes exactly one request. Failures are not retried.
pub struct ReceiptExtractor<C> {
    client: C,
}

impl<C: ExtractionClient> ReceiptExtractor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Build the request sent for an image.
    pub fn request_for(&self, image: &ImagePayload) -> VisionRequest {
        VisionRequest::new(
            INSTRUCTION,
            InlineImage::from_bytes(image.mime().as_str(), image.bytes()),
            response_schema(),
        )
    }

    /// Extract the receipt fields from an image.
    pub async fn extract(&self, image: &ImagePayload) -> Result<ReceiptFields> {
        let start = Instant::now();
        let request = self.request_for(image);

        info!(model = self.client.model_name(), mime_type = %image.mime(), "extracting receipt");
        let response = self
            .client
            .generate_json(&request)
            .await
            .inspect_err(|e| error!("Error processing receipt with vision model: {}", e))?;
        debug!("model answered in {:?}", start.elapsed());

        let fields = decode_fields(&response)?;
        info!(company = %fields.company, date = %fields.date, "extracted receipt");
        Ok(fields)
    }
}
