//! Generate command - turn one spreadsheet into a receipt document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use rasid_core::ingest::open_table;
use rasid_core::{
    BatchProcessor, HtmlRenderer, PdfRenderer, ProcessedBatch, RasidConfig, ReceiptRecord,
    ReceiptRenderer,
};

use super::config::load_config;

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Input spreadsheet (xlsx, xls, ods or csv)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: input name with the format's extension; stdout for json/csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pdf")]
    format: OutputFormat,

    /// Maximum number of data rows to read (overrides config)
    #[arg(long)]
    max_rows: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Printable PDF, one page per receipt
    Pdf,
    /// Printable HTML with page breaks
    Html,
    /// Receipt records as JSON
    Json,
    /// Receipt records as CSV
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// Whether the output is a printable document rather than data.
    fn is_document(self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::Html)
    }
}

pub async fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(max_rows) = args.max_rows {
        config.batch.max_rows = max_rows;
    }

    info!("Generating receipts from {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading spreadsheet");
    let batch = process_file(&args.input, &config)?;

    pb.set_message("Rendering receipts");
    let content = format_receipts(&batch.receipts, args.format, &config)?;

    pb.finish_and_clear();

    let output_path = match (&args.output, args.format.is_document()) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(args.input.with_extension(args.format.extension())),
        (None, false) => None,
    };

    match &output_path {
        Some(path) => {
            fs::write(path, &content)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => std::io::stdout().write_all(&content)?,
    }

    // Summary goes to stderr when the data itself went to stdout
    let summary = format!(
        "{} Generated {} receipts from {} rows ({} rejected) in {:?}",
        style("ℹ").blue(),
        batch.receipts.len(),
        batch.rows_considered,
        batch.rejected,
        start.elapsed()
    );
    if output_path.is_some() {
        println!("{}", summary);
    } else {
        eprintln!("{}", summary);
    }

    Ok(())
}

/// Read one spreadsheet and normalize its rows into receipts.
pub fn process_file(path: &Path, config: &RasidConfig) -> anyhow::Result<ProcessedBatch> {
    let table = open_table(path, config)?;
    let batch = BatchProcessor::new(config.batch.clone()).process(&table)?;
    Ok(batch)
}

/// Render receipts in the requested output format.
pub fn format_receipts(
    receipts: &[ReceiptRecord],
    format: OutputFormat,
    config: &RasidConfig,
) -> anyhow::Result<Vec<u8>> {
    let content = match format {
        OutputFormat::Pdf => PdfRenderer::new(config.render.clone()).render(receipts)?,
        OutputFormat::Html => HtmlRenderer::new(config.render.clone()).render(receipts)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_vec_pretty(receipts)?;
            json.push(b'\n');
            json
        }
        OutputFormat::Csv => format_csv(receipts)?,
    };
    Ok(content)
}

fn format_csv(receipts: &[ReceiptRecord]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["row", "payee", "amount", "amount_words", "work"])?;

    for receipt in receipts {
        wtr.write_record([
            &receipt.row.to_string(),
            &receipt.payee,
            &receipt.amount_display(),
            &receipt.amount_words,
            &receipt.work,
        ])?;
    }

    Ok(wtr.into_inner()?)
}
