//! Filter command - filter and export previously scanned receipts.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use rcpt_core::{Receipt, ReceiptBook};

use super::view::{self, ViewArgs};

/// Arguments for the filter command.
#[derive(Args)]
pub struct FilterArgs {
    /// JSON file with receipts, as written by `rcpt scan --format json`
    #[arg(required = true)]
    input: PathBuf,

    /// List the categories present instead of the receipts
    #[arg(long)]
    categories: bool,

    #[command(flatten)]
    view: ViewArgs,
}

pub async fn run(args: FilterArgs) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let records: Vec<Receipt> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid receipt file {}", args.input.display()))?;

    let mut book = ReceiptBook::new();
    for receipt in records {
        book.add_receipt(receipt);
    }
    info!("Loaded {} receipts from {}", book.receipts().len(), args.input.display());

    if args.categories {
        for category in book.categories() {
            println!("{}", category);
        }
        return Ok(());
    }

    view::present(&mut book, &args.view)
}
