//! Receipt data model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The structured fields read from a receipt image.
///
/// This is exactly what the extraction step produces: a `Receipt` without
/// its thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptFields {
    /// Date of the transaction.
    pub date: NaiveDate,

    /// Vendor name.
    pub company: String,

    /// Free-text spending category (e.g. "Groceries", "Dining").
    pub category: String,

    /// One-sentence summary of the purchased items.
    pub description: String,

    /// Final amount including tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Total tax amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_tax: Decimal,

    /// Goods and Services Tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub gst: Decimal,

    /// Provincial Sales Tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub pst: Decimal,
}

/// A receipt record: extracted fields paired with the source image.
///
/// Records are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub date: NaiveDate,

    pub company: String,

    pub category: String,

    pub description: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_tax: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub gst: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub pst: Decimal,

    /// The original image as a `data:<mime>;base64,...` URL.
    #[serde(default)]
    pub thumbnail: String,
}

impl Receipt {
    /// Combine extracted fields with the uploaded image.
    pub fn new(fields: ReceiptFields, thumbnail: impl Into<String>) -> Self {
        Self {
            date: fields.date,
            company: fields.company,
            category: fields.category,
            description: fields.description,
            total: fields.total,
            total_tax: fields.total_tax,
            gst: fields.gst,
            pst: fields.pst,
            thumbnail: thumbnail.into(),
        }
    }

    /// Check the advisory invariants and return any issues found.
    ///
    /// Nothing here rejects a record; amounts come straight from the model.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.company.trim().is_empty() {
            issues.push("Missing company name".to_string());
        }

        for (name, value) in [
            ("total", self.total),
            ("total tax", self.total_tax),
            ("GST", self.gst),
            ("PST", self.pst),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                issues.push(format!("Negative {} ({:.2})", name, value));
            }
        }

        let breakdown = self.gst + self.pst;
        if !breakdown.is_zero() && (breakdown - self.total_tax).abs() > Decimal::new(1, 2) {
            issues.push(format!(
                "GST + PST ({:.2}) differs from total tax ({:.2})",
                breakdown, self.total_tax
            ));
        }

        if self.total < self.total_tax {
            issues.push(format!(
                "Total ({:.2}) is less than total tax ({:.2})",
                self.total, self.total_tax
            ));
        }

        issues
    }
}
