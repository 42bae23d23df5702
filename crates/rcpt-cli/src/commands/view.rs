//! Filtering, rendering and export shared by `scan` and `filter`.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use comfy_table::{Attribute, Cell, CellAlignment, Table};
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use rcpt_core::{EXPORT_FILE_NAME, Receipt, ReceiptBook, ReceiptQuery, format_amount, to_csv};

/// View options: filters, output format and export target.
#[derive(Args, Debug, Default)]
pub struct ViewArgs {
    /// Case-insensitive text matched against company and description
    #[arg(short, long)]
    search: Option<String>,

    /// Exact category to keep
    #[arg(long)]
    category: Option<String>,

    /// Earliest date to keep (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    from: Option<String>,

    /// Latest date to keep (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    to: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Write the filtered receipts as CSV into this directory
    #[arg(short, long, value_name = "DIR")]
    export: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Receipt table
    #[default]
    Table,
    /// JSON records, readable by `rcpt filter`
    Json,
    /// CSV, same as the export file
    Csv,
    /// One detail block per receipt
    Text,
}

impl ViewArgs {
    /// The filter described by the flags.
    pub fn query(&self) -> ReceiptQuery {
        let mut query = ReceiptQuery::new();
        if let Some(text) = &self.search {
            query = query.with_text(text.as_str());
        }
        if let Some(category) = &self.category {
            query = query.with_category(category.as_str());
        }
        if let Some(from) = &self.from {
            query = query.with_start_date(from);
        }
        if let Some(to) = &self.to {
            query = query.with_end_date(to);
        }
        query
    }
}

/// Apply the filter, print the view and export it if asked.
pub fn present(book: &mut ReceiptBook, args: &ViewArgs) -> anyhow::Result<()> {
    book.set_filter(args.query());
    let filtered = book.query().is_active();
    let view = book.filtered_view();

    let output = match args.format {
        OutputFormat::Table => render_table(&view, filtered),
        OutputFormat::Json => serde_json::to_string_pretty(&view)?,
        OutputFormat::Csv => to_csv(view.iter().copied()),
        OutputFormat::Text => render_text(&view, filtered),
    };
    println!("{}", output);

    if let Some(dir) = &args.export {
        export(book, dir)?;
    }

    Ok(())
}

/// Write `receipts.csv` of the current view into `dir`. Nothing is written
/// for an empty view.
fn export(book: &ReceiptBook, dir: &Path) -> anyhow::Result<()> {
    let Some(csv) = book.export_view() else {
        eprintln!("{} No receipts to export.", style("ℹ").blue());
        return Ok(());
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, csv)?;
    info!("Exported receipts to {}", path.display());

    eprintln!("{} Exported to {}", style("✓").green(), path.display());
    Ok(())
}

fn empty_state(filtered: bool) -> String {
    if filtered {
        "No Receipts Match Filters\nTry adjusting your search criteria.".to_string()
    } else {
        "No receipts scanned yet\nUpload a receipt image to get started.".to_string()
    }
}

fn dollars(amount: Decimal) -> String {
    format!("${}", format_amount(amount))
}

pub(crate) fn render_table(view: &[&Receipt], filtered: bool) -> String {
    if view.is_empty() {
        return empty_state(filtered);
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Date"),
        Cell::new("Company"),
        Cell::new("Category"),
        Cell::new("Description"),
        Cell::new("GST"),
        Cell::new("PST"),
        Cell::new("Total Tax"),
        Cell::new("Total"),
    ]);

    for receipt in view {
        table.add_row(vec![
            Cell::new(receipt.date.format("%Y-%m-%d")),
            Cell::new(&receipt.company),
            Cell::new(&receipt.category),
            Cell::new(&receipt.description),
            Cell::new(dollars(receipt.gst)).set_alignment(CellAlignment::Right),
            Cell::new(dollars(receipt.pst)).set_alignment(CellAlignment::Right),
            Cell::new(dollars(receipt.total_tax)).set_alignment(CellAlignment::Right),
            Cell::new(dollars(receipt.total))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
        ]);
    }

    table.to_string()
}

pub(crate) fn render_text(view: &[&Receipt], filtered: bool) -> String {
    if view.is_empty() {
        return empty_state(filtered);
    }

    let blocks: Vec<String> = view
        .iter()
        .map(|r| {
            format!(
                "{}\n  Date:        {}\n  Category:    {}\n  Description: {}\n  GST:         {}\n  PST:         {}\n  Total Tax:   {}\n  Grand Total: {}",
                r.company,
                r.date.format("%Y-%m-%d"),
                r.category,
                r.description,
                dollars(r.gst),
                dollars(r.pst),
                dollars(r.total_tax),
                dollars(r.total),
            )
        })
        .collect();

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn receipt() -> Receipt {
        serde_json::from_value(serde_json::json!({
            "date": "2024-02-10",
            "company": "Beta",
            "category": "Dining",
            "description": "lunch",
            "total": 21.5,
            "totalTax": 1.5,
            "gst": 1.0,
            "pst": 0.5
        }))
        .unwrap()
    }

    #[test]
    fn test_query_from_flags() {
        let args = ViewArgs {
            search: Some("lunch".to_string()),
            category: Some("Dining".to_string()),
            from: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        let expected = ReceiptQuery::new()
            .with_text("lunch")
            .with_category("Dining")
            .with_start_date("2024-01-01");
        assert_eq!(args.query(), expected);
        assert!(!ViewArgs::default().query().is_active());
    }

    #[test]
    fn test_empty_states() {
        assert_eq!(
            render_table(&[], true),
            "No Receipts Match Filters\nTry adjusting your search criteria."
        );
        assert_eq!(
            render_text(&[], false),
            "No receipts scanned yet\nUpload a receipt image to get started."
        );
    }

    #[test]
    fn test_table_columns_and_amounts() {
        let r = receipt();
        let table = render_table(&[&r], false);
        for column in ["Date", "Company", "Category", "Description", "GST", "PST", "Total Tax", "Total"] {
            assert!(table.contains(column), "missing column {column}");
        }
        assert!(table.contains("$21.50"));
        assert!(table.contains("$0.50"));
    }

    #[test]
    fn test_text_detail_block() {
        let r = receipt();
        let text = render_text(&[&r, &r], false);
        assert!(text.starts_with("Beta\n  Date:        2024-02-10\n"));
        assert!(text.contains("  Grand Total: $21.50"));
        assert_eq!(text.matches("Grand Total").count(), 2);
    }
}
