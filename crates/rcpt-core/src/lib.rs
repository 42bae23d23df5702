//! Core library for receipt scanning.
//!
//! This crate provides:
//! - The receipt data model and its in-memory store
//! - Filtering by free text, category and inclusive date range
//! - CSV export of a receipt view
//! - Image payload validation and AI-backed field extraction
//! - `ReceiptBook`, the application state tying these together

pub mod app;
pub mod error;
pub mod export;
pub mod extraction;
pub mod filter;
pub mod payload;
pub mod models;
pub mod store;

pub use app::{ReceiptBook, user_message};
pub use error::{Result, ScanError};
pub use export::{CSV_HEADER, EXPORT_FILE_NAME, format_amount, to_csv};
pub use extraction::{ReceiptExtractor, decode_fields};
pub use filter::{DateBound, ReceiptQuery, distinct_categories, filter_receipts};
pub use payload::{ImageMime, ImagePayload};
pub use models::receipt::{Receipt, ReceiptFields};
pub use store::ReceiptStore;

#[cfg(feature = "native")]
pub use payload::read_image;

/// Re-export vision client types.
pub use rcpt_vision::{ExtractionClient, InlineImage, VisionError, VisionRequest};

#[cfg(feature = "native")]
pub use rcpt_vision::{GeminiClient, GeminiConfig};
