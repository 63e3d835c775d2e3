//! Row validation and normalization into receipt records.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::trace;

use crate::models::config::BatchConfig;
use crate::models::receipt::{ColumnBinding, ReceiptRecord};
use crate::models::table::{CellValue, Row};

use super::words::WordsCache;

/// Why a row was left out of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    /// Amount cell is empty or a null marker.
    MissingAmount,
    /// Amount cell is not a number.
    InvalidAmount,
    /// Amount is zero or negative once rounded to two digits.
    NonPositiveAmount,
    /// Payee cell is empty or a null marker.
    MissingPayee,
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            RowRejection::MissingAmount => "missing amount",
            RowRejection::InvalidAmount => "amount is not a number",
            RowRejection::NonPositiveAmount => "amount is not positive",
            RowRejection::MissingPayee => "missing payee",
        };
        f.write_str(reason)
    }
}

/// Turns table rows into receipt records.
pub struct RowNormalizer<'a> {
    config: &'a BatchConfig,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(config: &'a BatchConfig) -> Self {
        Self { config }
    }

    /// Normalize a row, spelling amounts without a cache.
    pub fn normalize(
        &self,
        row: &Row<'_>,
        binding: &ColumnBinding,
    ) -> Result<ReceiptRecord, RowRejection> {
        self.normalize_with(row, binding, &mut WordsCache::new(0))
    }

    /// Normalize a row, spelling amounts through `cache`.
    pub fn normalize_with(
        &self,
        row: &Row<'_>,
        binding: &ColumnBinding,
        cache: &mut WordsCache,
    ) -> Result<ReceiptRecord, RowRejection> {
        let amount = self.amount(row.cell(binding.amount.index))?;
        let payee = self
            .text(row.cell(binding.payee.index))
            .ok_or(RowRejection::MissingPayee)?;
        let work = self
            .text(row.cell(binding.work.index))
            .unwrap_or_else(|| self.config.default_work.clone());

        let whole = amount.trunc().to_u128().ok_or(RowRejection::InvalidAmount)?;

        let record = ReceiptRecord {
            payee,
            amount,
            amount_words: cache.words(whole),
            work,
            row: row.number(),
        };
        trace!("Row {} -> {:?}", row.number(), record);
        Ok(record)
    }

    /// Positive amount rounded to two fraction digits.
    fn amount(&self, cell: Option<&CellValue>) -> Result<Decimal, RowRejection> {
        let cell = match cell {
            None => return Err(RowRejection::MissingAmount),
            Some(c) if c.is_blank() => return Err(RowRejection::MissingAmount),
            Some(CellValue::Text(s)) if self.config.is_null_marker(s) => {
                return Err(RowRejection::MissingAmount)
            }
            Some(c) => c,
        };

        let value = cell.to_decimal().ok_or(RowRejection::InvalidAmount)?;

        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded <= Decimal::ZERO {
            return Err(RowRejection::NonPositiveAmount);
        }
        rounded.rescale(2);
        Ok(rounded)
    }

    /// Trimmed cell text, or `None` when blank or a null marker.
    fn text(&self, cell: Option<&CellValue>) -> Option<String> {
        let text = cell?.to_string();
        let text = text.trim();
        if text.is_empty() || self.config.is_null_marker(text) {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// Normalize one row with the given configuration.
pub fn normalize_row(
    row: &Row<'_>,
    binding: &ColumnBinding,
    config: &BatchConfig,
) -> Option<ReceiptRecord> {
    RowNormalizer::new(config).normalize(row, binding).ok()
}
