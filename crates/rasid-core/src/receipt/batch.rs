//! Batch processing: from a raw table to an ordered list of receipts.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use tracing::{debug, info};

use crate::error::BatchError;
use crate::models::config::BatchConfig;
use crate::models::receipt::{ColumnBinding, ReceiptRecord};
use crate::models::table::RawTable;

use super::columns::resolve_columns;
use super::rows::RowNormalizer;
use super::words::WordsCache;

/// Result of processing one table.
#[derive(Debug, Clone)]
pub struct ProcessedBatch {
    /// Valid receipts in source row order.
    pub receipts: Vec<ReceiptRecord>,
    /// How the columns were bound.
    pub binding: ColumnBinding,
    /// Rows examined (never more than the row cap).
    pub rows_considered: usize,
    /// Rows left out during validation.
    pub rejected: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ProcessedBatch {
    /// The receipts, in order.
    pub fn into_receipts(self) -> Vec<ReceiptRecord> {
        self.receipts
    }
}

/// Validates and normalizes a table into receipts.
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    config: BatchConfig,
}

impl BatchProcessor {
    /// Create a processor with the given configuration.
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Override the row cap.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.config.max_rows = max_rows;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process a table with a fresh words cache sized from the configuration.
    pub fn process(&self, table: &RawTable) -> Result<ProcessedBatch, BatchError> {
        let mut cache = WordsCache::new(self.config.words_cache_size);
        self.process_with_cache(table, &mut cache)
    }

    /// Process a table, spelling amounts through a caller-owned cache.
    pub fn process_with_cache(
        &self,
        table: &RawTable,
        cache: &mut WordsCache,
    ) -> Result<ProcessedBatch, BatchError> {
        let timer = Stopwatch::start();

        let rows_considered = table.len().min(self.config.max_rows);
        if rows_considered == 0 {
            return Err(BatchError::EmptyTable);
        }

        let binding = resolve_columns(table.headers(), &self.config.role_aliases)?;

        let normalizer = RowNormalizer::new(&self.config);
        let mut receipts = Vec::with_capacity(rows_considered);
        let mut rejected = 0;

        for row in table.rows().take(self.config.max_rows) {
            match normalizer.normalize_with(&row, &binding, cache) {
                Ok(record) => receipts.push(record),
                Err(reason) => {
                    debug!("Skipping row {}: {}", row.number(), reason);
                    rejected += 1;
                }
            }
        }

        if receipts.is_empty() {
            return Err(BatchError::NoValidData);
        }

        let processing_time_ms = timer.elapsed_ms();
        info!(
            "Processed {} rows: {} receipts, {} rejected in {}ms",
            rows_considered,
            receipts.len(),
            rejected,
            processing_time_ms
        );

        Ok(ProcessedBatch {
            receipts,
            binding,
            rows_considered,
            rejected,
            processing_time_ms,
        })
    }
}

/// Elapsed wall-clock time; always zero on wasm32, which has no `Instant`.
struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: Instant,
}

impl Stopwatch {
    fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: Instant::now(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed_ms(&self) -> u64 {
        0
    }
}
