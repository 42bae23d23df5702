//! WASM bindings for receipt scanning.
//!
//! The browser talks to the vision model itself. This crate builds the
//! request, checks the model's answer, and keeps the receipt book that the
//! page filters and exports.

use serde_json::json;
use wasm_bindgen::prelude::*;

use rcpt_core::extraction::prompt::{INSTRUCTION, response_schema};
use rcpt_core::{
    ImageMime, ImagePayload, Receipt, ReceiptQuery, ScanError, VisionError, decode_fields,
    user_message,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Mime types accepted for upload.
#[wasm_bindgen]
pub fn accepted_mime_types() -> js_sys::Array {
    ImageMime::ALL
        .iter()
        .map(|m| JsValue::from_str(m.as_str()))
        .collect()
}

/// Build the extraction request for an image given as a data URL.
///
/// Returns `{ instruction, mimeType, data, responseSchema }`.
#[wasm_bindgen]
pub fn extraction_request(image_data_url: &str) -> Result<JsValue, JsValue> {
    let payload = ImagePayload::from_data_url(image_data_url).map_err(to_js)?;
    let request = json!({
        "instruction": INSTRUCTION,
        "mimeType": payload.mime().as_str(),
        "data": payload.to_base64(),
        "responseSchema": response_schema(),
    });

    to_value(&request)
}

/// Check a model answer and return the receipt fields.
#[wasm_bindgen]
pub fn decode_extraction(answer: &str) -> Result<JsValue, JsValue> {
    let fields = parse_answer(answer).map_err(to_js)?;
    to_value(&fields)
}

fn parse_answer(answer: &str) -> rcpt_core::Result<rcpt_core::ReceiptFields> {
    let value: serde_json::Value =
        serde_json::from_str(answer).map_err(|e| ScanError::from(VisionError::from(e)))?;
    decode_fields(&value)
}

fn to_value<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js(err: ScanError) -> JsValue {
    JsValue::from_str(&user_message(&err))
}

/// Receipt book for browser use.
#[wasm_bindgen(js_name = ReceiptBook)]
pub struct ReceiptBookJs {
    inner: rcpt_core::ReceiptBook,
}

#[wasm_bindgen(js_class = ReceiptBook)]
impl ReceiptBookJs {
    /// Create an empty book.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: rcpt_core::ReceiptBook::new(),
        }
    }

    /// Add the model answer for an uploaded image.
    ///
    /// Clears the previous error. On failure the book keeps the new error
    /// message and nothing is added.
    #[wasm_bindgen]
    pub fn add_extraction(&mut self, answer: &str, image_data_url: &str) -> Result<JsValue, JsValue> {
        self.inner.begin_upload();
        let result = ImagePayload::from_data_url(image_data_url).and_then(|payload| {
            let fields = parse_answer(answer)?;
            Ok(Receipt::new(fields, payload.to_data_url()))
        });

        match self.inner.finish_upload(result) {
            Ok(receipt) => to_value(receipt),
            Err(err) => {
                web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
                Err(to_js(err))
            }
        }
    }

    /// Add a previously stored receipt record.
    #[wasm_bindgen]
    pub fn add_receipt(&mut self, receipt: JsValue) -> Result<usize, JsValue> {
        let receipt: Receipt = serde_wasm_bindgen::from_value(receipt)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.inner.add_receipt(receipt))
    }

    /// Number of stored receipts.
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.receipts().len()
    }

    /// All receipts, newest first.
    #[wasm_bindgen]
    pub fn receipts(&self) -> Result<JsValue, JsValue> {
        to_value(self.inner.receipts())
    }

    /// Replace the filter. Empty strings disable a criterion.
    #[wasm_bindgen]
    pub fn set_filter(&mut self, text: &str, category: &str, start_date: &str, end_date: &str) {
        self.inner.set_filter(
            ReceiptQuery::new()
                .with_text(text)
                .with_category(category)
                .with_start_date(start_date)
                .with_end_date(end_date),
        );
    }

    #[wasm_bindgen]
    pub fn clear_filters(&mut self) {
        self.inner.clear_filters();
    }

    /// Whether any filter criterion is set.
    #[wasm_bindgen]
    pub fn is_filtered(&self) -> bool {
        self.inner.query().is_active()
    }

    /// Receipts passing the current filter.
    #[wasm_bindgen]
    pub fn filtered_view(&self) -> Result<JsValue, JsValue> {
        to_value(&self.inner.filtered_view())
    }

    /// Distinct categories, in first-seen order.
    #[wasm_bindgen]
    pub fn categories(&self) -> js_sys::Array {
        self.inner
            .categories()
            .iter()
            .map(|c| JsValue::from_str(c))
            .collect()
    }

    /// CSV of the current view, or `undefined` when it is empty.
    #[wasm_bindgen]
    pub fn export_csv(&self) -> Option<String> {
        self.inner.export_view()
    }

    /// Open the detail view of a receipt. Returns `undefined` for a bad index.
    #[wasm_bindgen]
    pub fn select(&mut self, index: usize) -> Result<JsValue, JsValue> {
        match self.inner.select(index) {
            Some(receipt) => to_value(receipt),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen]
    pub fn close_selection(&mut self) {
        self.inner.close_selection();
    }

    /// Message of the last failed upload.
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.inner.error().map(str::to_string)
    }
}

impl Default for ReceiptBookJs {
    fn default() -> Self {
        Self::new()
    }
}
