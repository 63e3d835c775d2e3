//! Raw tabular data as decoded from an uploaded spreadsheet.

use std::fmt;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Whole number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Text.
    Text(String),
    /// Missing value.
    Empty,
}

impl CellValue {
    /// True for missing cells and for text that is blank after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Coerce the cell to a decimal number.
    ///
    /// Text is trimmed and accepted in plain or scientific notation.
    /// Booleans, non-finite floats and blank cells yield `None`.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Int(i) => Some(Decimal::from(*i)),
            CellValue::Float(f) if f.is_finite() => Decimal::from_f64(*f),
            CellValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

/// An ordered table of rows over a unique header list.
///
/// Constructed once per upload and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableShape", into = "TableShape")]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Wire shape: `{"headers": [...], "rows": [[...], ...]}`.
#[derive(Serialize, Deserialize)]
struct TableShape {
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<CellValue>>,
}

impl From<TableShape> for RawTable {
    fn from(shape: TableShape) -> Self {
        RawTable::new(shape.headers, shape.rows)
    }
}

impl From<RawTable> for TableShape {
    fn from(table: RawTable) -> Self {
        TableShape {
            headers: table.headers,
            rows: table.rows,
        }
    }
}

impl RawTable {
    /// Build a table, making headers unique and squaring rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers = unique_headers(headers);
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Column headers in table order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(move |(i, cells)| Row {
            number: i + 1,
            headers: &self.headers,
            cells,
        })
    }

    /// Position of a header in the table.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    number: usize,
    headers: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// 1-based data row number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Cell under the given header.
    pub fn get(&self, header: &str) -> Option<&'a CellValue> {
        let idx = self.headers.iter().position(|h| h == header)?;
        self.cells.get(idx)
    }

    /// Cell at the given column index.
    pub fn cell(&self, index: usize) -> Option<&'a CellValue> {
        self.cells.get(index)
    }
}

/// Blank headers become `Unnamed: <index>`, repeats get `.1`, `.2`, ... suffixes.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(headers.len());

    for (i, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", i)
        } else {
            header
        };

        let mut candidate = base.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{}.{}", base, n);
            n += 1;
        }
        out.push(candidate);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unique_headers() {
        let table = RawTable::new(
            vec!["Name".into(), "".into(), "Name".into(), "Name".into()],
            vec![],
        );
        assert_eq!(table.headers(), &["Name", "Unnamed: 1", "Name.1", "Name.2"]);
    }

    #[test]
    fn test_rows_are_squared() {
        let table = RawTable::new(
            vec!["A".into(), "B".into()],
            vec![vec![CellValue::from("x")], vec!["1".into(), "2".into(), "3".into()]],
        );
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("B"), Some(&CellValue::Empty));
        assert_eq!(rows[1].cell(2), None);
        assert_eq!(rows[1].number(), 2);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(CellValue::Int(2000).to_decimal(), Some(Decimal::from(2000)));
        assert_eq!(
            CellValue::Float(1500.5).to_decimal(),
            Some(Decimal::from_str("1500.5").unwrap())
        );
        assert_eq!(
            CellValue::from(" 42.75 ").to_decimal(),
            Some(Decimal::from_str("42.75").unwrap())
        );
        assert_eq!(CellValue::from("1e3").to_decimal(), Some(Decimal::from(1000)));
        assert_eq!(CellValue::from("abc").to_decimal(), None);
        assert_eq!(CellValue::Float(f64::NAN).to_decimal(), None);
        assert_eq!(CellValue::Bool(true).to_decimal(), None);
        assert_eq!(CellValue::Empty.to_decimal(), None);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"headers": ["Payee Name", "Amount"], "rows": [["Alice", 1500.5], [null, 2000]]}"#;
        let table: RawTable = serde_json::from_str(json).unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("Amount"), Some(&CellValue::Float(1500.5)));
        assert_eq!(rows[1].get("Payee Name"), Some(&CellValue::Empty));
        assert_eq!(rows[1].get("Amount"), Some(&CellValue::Int(2000)));
    }
}
