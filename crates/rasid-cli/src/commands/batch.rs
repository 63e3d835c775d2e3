//! Batch command - generate receipts for many spreadsheets.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use rasid_core::RasidConfig;

use super::config::load_config;
use super::generate::{format_receipts, process_file, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input spreadsheets
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "pdf")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single spreadsheet.
struct FileResult {
    path: PathBuf,
    output: Option<PathBuf>,
    receipts: usize,
    rejected: usize,
    total_amount: String,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern, keeping only accepted spreadsheet types
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_accepted(p, &config))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching spreadsheets found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} spreadsheets to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let output_path = output_path_for(&path, args.output_dir.as_deref(), args.format);
        let result = generate_one(&path, &output_path, args.format, &config);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok((receipts, rejected, total_amount)) => {
                debug!("Wrote {} receipts to {}", receipts, output_path.display());
                results.push(FileResult {
                    path,
                    output: Some(output_path),
                    receipts,
                    rejected,
                    total_amount,
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        output: None,
                        receipts: 0,
                        rejected: 0,
                        total_amount: String::new(),
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.error.is_none()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} spreadsheets in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} receipts",
        style(successful.len()).green(),
        style(failed.len()).red(),
        successful.iter().map(|r| r.receipts).sum::<usize>()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn is_accepted(path: &Path, config: &RasidConfig) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    config
        .ingest
        .allowed_extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// `<dir>/<stem>.<ext>`, or next to the input when no directory is given.
fn output_path_for(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipts");
    let name = format!("{}.{}", stem, format.extension());

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Generate one output file; returns receipt count, rejected rows and total amount.
fn generate_one(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    config: &RasidConfig,
) -> anyhow::Result<(usize, usize, String)> {
    if input == output {
        anyhow::bail!("Output would overwrite the input file {}", input.display());
    }

    let batch = process_file(input, config)?;
    let content = format_receipts(&batch.receipts, format, config)?;
    fs::write(output, content)?;

    let total: rust_decimal::Decimal = batch.receipts.iter().map(|r| r.amount).sum();
    Ok((batch.receipts.len(), batch.rejected, format!("{:.2}", total)))
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "output",
        "receipts",
        "rejected_rows",
        "total_amount",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let output = result
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match &result.error {
            None => wtr.write_record([
                filename,
                "success",
                &output,
                &result.receipts.to_string(),
                &result.rejected.to_string(),
                &result.total_amount,
                &result.processing_time_ms.to_string(),
                "",
            ])?,
            Some(error) => wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                error,
            ])?,
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for() {
        let input = Path::new("/data/march/payments.xlsx");
        assert_eq!(
            output_path_for(input, None, OutputFormat::Pdf),
            PathBuf::from("/data/march/payments.pdf")
        );
        assert_eq!(
            output_path_for(input, Some(Path::new("out")), OutputFormat::Html),
            PathBuf::from("out/payments.html")
        );
    }

    #[test]
    fn test_is_accepted() {
        let config = RasidConfig::default();
        assert!(is_accepted(Path::new("a.XLSX"), &config));
        assert!(is_accepted(Path::new("a.csv"), &config));
        assert!(!is_accepted(Path::new("a.txt"), &config));
        assert!(!is_accepted(Path::new("summary"), &config));
    }
}
