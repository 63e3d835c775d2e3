//! CSV tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use super::{Result, TableSource};
use crate::models::table::{CellValue, RawTable};

/// Reads a table from CSV data. The first record is the header row.
pub struct CsvSource<R: Read> {
    reader: csv::Reader<R>,
}

impl CsvSource<File> {
    /// Open a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::from_reader(File::open(path)?))
    }
}

impl<R: Read> CsvSource<R> {
    /// Read CSV from any byte source.
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self { reader }
    }
}

impl<R: Read> TableSource for CsvSource<R> {
    fn read_table(&mut self, max_rows: usize) -> Result<RawTable> {
        let headers: Vec<String> = self.reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        // Records past the cap are never parsed.
        for record in self.reader.records().take(max_rows) {
            rows.push(to_cells(&record?));
        }

        Ok(RawTable::new(headers, rows))
    }
}

fn to_cells(record: &StringRecord) -> Vec<CellValue> {
    record
        .iter()
        .map(|field| {
            if field.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(field.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reads_headers_and_rows() {
        let data = "Payee Name,Amount,Work\nAlice,1500.50,Cabling\n\"Bob, Jr.\",200,\n";
        let table = CsvSource::from_reader(data.as_bytes()).read_table(50).unwrap();

        assert_eq!(table.headers(), &["Payee Name", "Amount", "Work"]);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[1].get("Payee Name"), Some(&CellValue::from("Bob, Jr.")));
        assert_eq!(rows[1].get("Work"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_stops_at_row_cap() {
        // The malformed UTF-8 in the last record would fail if it were read.
        let mut data = b"Name,Amount,Work\nA,1,W\nB,2,W\n".to_vec();
        data.extend_from_slice(b"C,\xff\xfe,W\n");

        let table = CsvSource::from_reader(data.as_slice()).read_table(2).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = "A,B,C\n1\n";
        let table = CsvSource::from_reader(data.as_bytes()).read_table(10).unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("C"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_duplicate_headers() {
        let data = "Name,Name,Amount\n";
        let table = CsvSource::from_reader(data.as_bytes()).read_table(10).unwrap();
        assert_eq!(table.headers(), &["Name", "Name.1", "Amount"]);
        assert!(table.is_empty());
    }
}
