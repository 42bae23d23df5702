//! Filtering of receipt views.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::trace;

use crate::models::receipt::Receipt;

/// One end of a date range, as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// A valid `YYYY-MM-DD` date.
    Date(NaiveDate),
    /// Text that is not a valid date. Never matches any receipt.
    Invalid,
}

impl DateBound {
    /// Parse user input. Only the empty string means "no bound"; blank
    /// text is an invalid bound.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }

        Some(
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(DateBound::Date)
                .unwrap_or(DateBound::Invalid),
        )
    }
}

/// Filter criteria for a receipt view. All criteria must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptQuery {
    /// Case-insensitive substring of company or description. Empty matches all.
    pub text: String,
    /// Exact category. Empty matches all.
    pub category: String,
    /// Inclusive lower bound.
    pub start_date: Option<DateBound>,
    /// Inclusive upper bound.
    pub end_date: Option<DateBound>,
}

impl ReceiptQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the start date from user input; empty input clears it.
    pub fn with_start_date(mut self, date: &str) -> Self {
        self.start_date = DateBound::parse(date);
        self
    }

    /// Set the end date from user input; empty input clears it.
    pub fn with_end_date(mut self, date: &str) -> Self {
        self.end_date = DateBound::parse(date);
        self
    }

    /// Whether any criterion is set.
    pub fn is_active(&self) -> bool {
        !self.text.is_empty()
            || !self.category.is_empty()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    /// Reset every criterion.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether a single receipt passes the query.
    pub fn matches(&self, receipt: &Receipt) -> bool {
        self.matches_text(receipt) && self.matches_category(receipt) && self.matches_dates(receipt)
    }

    fn matches_text(&self, receipt: &Receipt) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        receipt.company.to_lowercase().contains(&needle)
            || receipt.description.to_lowercase().contains(&needle)
    }

    fn matches_category(&self, receipt: &Receipt) -> bool {
        self.category.is_empty() || receipt.category == self.category
    }

    // Receipt dates carry no time, so comparing whole days is the same as
    // comparing against start-of-day and end-of-day instants.
    fn matches_dates(&self, receipt: &Receipt) -> bool {
        let after_start = match self.start_date {
            None => true,
            Some(DateBound::Date(start)) => receipt.date >= start,
            Some(DateBound::Invalid) => false,
        };
        let before_end = match self.end_date {
            None => true,
            Some(DateBound::Date(end)) => receipt.date <= end,
            Some(DateBound::Invalid) => false,
        };
        after_start && before_end
    }
}

/// Receipts passing `query`, in their original order.
pub fn filter_receipts<'a>(records: &'a [Receipt], query: &ReceiptQuery) -> Vec<&'a Receipt> {
    let view: Vec<&Receipt> = records.iter().filter(|r| query.matches(r)).collect();
    trace!(total = records.len(), shown = view.len(), "filtered receipts");
    view
}

/// Distinct categories in first-seen order.
pub fn distinct_categories(records: &[Receipt]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.category.as_str()))
        .map(|r| r.category.clone())
        .collect()
}
