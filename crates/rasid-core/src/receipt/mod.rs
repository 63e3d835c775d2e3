//! Row-to-receipt normalization pipeline.
//!
//! Columns are resolved once per table, every row under the cap is
//! normalized in order, and rejected rows are dropped without failing the
//! batch.

mod batch;
pub mod columns;
pub mod rows;
pub mod words;

pub use batch::{BatchProcessor, ProcessedBatch};
pub use columns::{find_column, resolve_columns, ResolveError};
pub use rows::{normalize_row, RowNormalizer, RowRejection};
pub use words::{amount_in_words, rupees_in_words, WordsCache};
