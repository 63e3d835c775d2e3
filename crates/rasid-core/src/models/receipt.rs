//! Receipt records and the column roles they are built from.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Abstract meaning of a spreadsheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    /// Who is being paid.
    Payee,
    /// How much is paid.
    Amount,
    /// What the payment is for.
    Work,
}

impl SemanticRole {
    /// All roles in resolution order.
    pub const ALL: [SemanticRole; 3] = [SemanticRole::Payee, SemanticRole::Amount, SemanticRole::Work];
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticRole::Payee => "Payee",
            SemanticRole::Amount => "Amount",
            SemanticRole::Work => "Work",
        };
        f.write_str(name)
    }
}

/// A header bound to a role, with its position in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundColumn {
    /// Header text exactly as it appears in the table.
    pub header: String,
    /// Zero-based column index.
    pub index: usize,
}

/// Resolved role-to-header mapping for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnBinding {
    pub payee: BoundColumn,
    pub amount: BoundColumn,
    pub work: BoundColumn,
}

impl ColumnBinding {
    /// Column bound to the given role.
    pub fn column(&self, role: SemanticRole) -> &BoundColumn {
        match role {
            SemanticRole::Payee => &self.payee,
            SemanticRole::Amount => &self.amount,
            SemanticRole::Work => &self.work,
        }
    }
}

/// A validated receipt, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Payee name (trimmed, never empty).
    pub payee: String,

    /// Amount, always positive with exactly two fraction digits.
    pub amount: Decimal,

    /// Integer part of the amount in words.
    pub amount_words: String,

    /// Description of the work paid for.
    pub work: String,

    /// 1-based source row number.
    #[serde(default)]
    pub row: usize,
}

impl ReceiptRecord {
    /// Amount as displayed on the receipt, e.g. `1500.50`.
    pub fn amount_display(&self) -> String {
        format!("{:.2}", self.amount)
    }
}
