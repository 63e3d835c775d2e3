//! Spreadsheet ingest: uploaded files into raw tables.

mod csv_source;
#[cfg(feature = "native")]
mod workbook;

pub use csv_source::CsvSource;
#[cfg(feature = "native")]
pub use workbook::WorkbookSource;

use std::path::Path;

use tracing::{debug, info};

use crate::error::IngestError;
use crate::models::config::RasidConfig;
use crate::models::config::IngestConfig;
use crate::models::table::RawTable;

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Kind of spreadsheet, decided from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Excel or OpenDocument workbook.
    Workbook,
    /// Comma-separated values.
    Csv,
}

/// Trait for anything that can produce a raw table.
pub trait TableSource {
    /// Read the header row and at most `max_rows` data rows.
    fn read_table(&mut self, max_rows: usize) -> Result<RawTable>;
}

/// Check that an uploaded file exists, has an accepted extension and fits the size limit.
pub fn validate_upload(path: &Path, config: &IngestConfig) -> Result<SpreadsheetFormat> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let allowed = config
        .allowed_extensions
        .iter()
        .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&extension));
    if extension.is_empty() || !allowed {
        return Err(IngestError::UnsupportedFormat(
            extension,
            config.allowed_extensions.join(", "),
        ));
    }

    let size = std::fs::metadata(path)?.len();
    if size > config.max_file_size {
        return Err(IngestError::FileTooLarge {
            size,
            limit: config.max_file_size,
        });
    }

    let format = match extension.as_str() {
        "csv" => SpreadsheetFormat::Csv,
        _ => SpreadsheetFormat::Workbook,
    };
    debug!("{} accepted as {:?} ({} bytes)", path.display(), format, size);
    Ok(format)
}

/// Validate and read a spreadsheet, honouring the configured row cap.
pub fn open_table(path: &Path, config: &RasidConfig) -> Result<RawTable> {
    let format = validate_upload(path, &config.ingest)?;
    let max_rows = config.batch.max_rows;

    let table = match format {
        SpreadsheetFormat::Csv => CsvSource::from_path(path)?.read_table(max_rows)?,
        #[cfg(feature = "native")]
        SpreadsheetFormat::Workbook => {
            WorkbookSource::open(path, config.ingest.sheet.clone())?.read_table(max_rows)?
        }
        #[cfg(not(feature = "native"))]
        SpreadsheetFormat::Workbook => {
            return Err(IngestError::UnsupportedFormat(
                "workbook".to_string(),
                "csv".to_string(),
            ))
        }
    };

    info!(
        "Read {} rows with headers {:?} from {}",
        table.len(),
        table.headers(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payments.txt");
        std::fs::write(&path, "x").unwrap();

        let err = validate_upload(&path, &IngestConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(ext, _) if ext == "txt"));
    }

    #[test]
    fn test_rejects_missing_file() {
        let err = validate_upload(Path::new("/nonexistent/file.xlsx"), &IngestConfig::default())
            .unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn test_rejects_large_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.CSV");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[b'a'; 64]).unwrap();

        let config = IngestConfig {
            max_file_size: 32,
            ..IngestConfig::default()
        };
        let err = validate_upload(&path, &config).unwrap_err();
        assert!(matches!(err, IngestError::FileTooLarge { size: 64, limit: 32 }));
    }

    #[test]
    fn test_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("a.csv");
        let xlsx = dir.path().join("a.XLSX");
        std::fs::write(&csv, "x").unwrap();
        std::fs::write(&xlsx, "x").unwrap();

        let config = IngestConfig::default();
        assert_eq!(validate_upload(&csv, &config).unwrap(), SpreadsheetFormat::Csv);
        assert_eq!(validate_upload(&xlsx, &config).unwrap(), SpreadsheetFormat::Workbook);
    }

    #[test]
    fn test_open_csv_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payments.csv");
        std::fs::write(&path, "Payee Name,Amount,Work\nAlice,1500.50,Cabling\nBob,200,\n").unwrap();

        let table = open_table(&path, &RasidConfig::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), &["Payee Name", "Amount", "Work"]);
    }
}
