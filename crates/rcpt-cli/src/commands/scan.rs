//! Scan command - extract receipts from images.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use rcpt_core::{
    ExtractionClient, GeminiClient, ImageMime, ReceiptBook, ReceiptExtractor, format_amount,
    user_message,
};

use super::load_config;
use super::view::{self, ViewArgs};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Receipt images or glob patterns (PNG, JPEG or GIF)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Report receipts whose amounts do not add up
    #[arg(long)]
    validate: bool,

    /// Stop at the first failed upload
    #[arg(long)]
    fail_fast: bool,

    #[command(flatten)]
    view: ViewArgs,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Credentials are checked before any file is touched.
    let client = GeminiClient::from_env(&config.gemini())?;
    let extractor = ReceiptExtractor::new(client);

    let files = expand_inputs(&args.inputs)?;
    debug!("Scanning {} files", files.len());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));

    let mut book = ReceiptBook::new();
    let scanned = scan_files(&mut book, &extractor, &files, &args, &pb).await;
    pb.finish_and_clear();
    let failed = scanned?;

    eprintln!(
        "{} Scanned {} of {} receipts in {:.1}s",
        style("ℹ").blue(),
        files.len() - failed,
        files.len(),
        start.elapsed().as_secs_f64()
    );

    view::present(&mut book, &args.view)?;

    if book.receipts().is_empty() {
        anyhow::bail!("No receipts could be extracted");
    }

    Ok(())
}

/// Upload each file in turn. Returns the number of failed uploads.
///
/// A failure is reported and the next file is scanned, unless `--fail-fast`
/// is set.
async fn scan_files<C: ExtractionClient>(
    book: &mut ReceiptBook,
    extractor: &ReceiptExtractor<C>,
    files: &[PathBuf],
    args: &ScanArgs,
    pb: &ProgressBar,
) -> anyhow::Result<usize> {
    let mut failed = 0usize;

    for path in files {
        pb.set_message(format!("Scanning {}...", path.display()));

        match book.upload(extractor, path).await {
            Ok(receipt) => {
                pb.println(format!(
                    "{} {} {} ${}",
                    style("✓").green(),
                    receipt.date.format("%Y-%m-%d"),
                    receipt.company,
                    format_amount(receipt.total)
                ));

                if args.validate {
                    for issue in receipt.validate() {
                        pb.println(format!("  {} {}", style("!").yellow(), issue));
                    }
                }
            }
            Err(e) => {
                let message = user_message(&e);
                if args.fail_fast {
                    anyhow::bail!("{}: {}", path.display(), message);
                }
                warn!("Failed to scan {}: {}", path.display(), e);
                pb.println(format!("{} {}: {}", style("✗").red(), path.display(), message));
                failed += 1;
            }
        }
    }

    Ok(failed)
}

/// Expand paths and glob patterns into the list of images to upload.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let matches: Vec<PathBuf> = glob(input)?.filter_map(|r| r.ok()).collect();
        if matches.is_empty() {
            warn!("No files match {}", input);
        }

        for path in matches {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ImageMime::from_extension(ext).is_some() {
                files.push(path);
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("No receipt images found (supported formats: PNG, JPEG, GIF)");
    }

    Ok(files)
}
