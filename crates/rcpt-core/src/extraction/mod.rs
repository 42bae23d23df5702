//! Receipt field extraction through a vision model.

mod decode;
mod extractor;
pub mod prompt;

pub use decode::decode_fields;
pub use extractor::ReceiptExtractor;

#[cfg(test)]
pub(crate) use extractor::tests;
