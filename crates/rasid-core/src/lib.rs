//! Core library for hand receipt (RPWA 28) generation.
//!
//! This crate provides:
//! - Spreadsheet ingest (xlsx/xls/ods workbooks and CSV) into a raw table
//! - Column discovery mapping headers to payee, amount and work roles
//! - Row validation and normalization into receipt records
//! - Amount in words using the Indian numbering system (crore, lakh, thousand)
//! - HTML and PDF rendering of receipt batches

pub mod error;
pub mod models;
pub mod ingest;
pub mod receipt;
pub mod render;

pub use error::{RasidError, Result};
pub use models::config::RasidConfig;
pub use models::receipt::{ColumnBinding, ReceiptRecord, SemanticRole};
pub use models::table::{CellValue, RawTable, Row};
pub use receipt::{amount_in_words, rupees_in_words, BatchProcessor, ProcessedBatch, WordsCache};
pub use render::{HtmlRenderer, ReceiptRenderer};
#[cfg(feature = "native")]
pub use render::PdfRenderer;
