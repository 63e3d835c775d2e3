//! Excel and OpenDocument workbooks via calamine.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use tracing::debug;

use super::{Result, TableSource};
use crate::error::IngestError;
use crate::models::table::{CellValue, RawTable};

/// Reads a table from one worksheet. The first row is the header row.
pub struct WorkbookSource {
    workbook: Sheets<BufReader<File>>,
    sheet: Option<String>,
}

impl WorkbookSource {
    /// Open a workbook; `sheet` selects a worksheet by name (default: the first).
    pub fn open(path: &Path, sheet: Option<String>) -> Result<Self> {
        let workbook = open_workbook_auto(path)
            .map_err(|e| IngestError::Workbook(format!("could not open {}: {}", path.display(), e)))?;
        Ok(Self { workbook, sheet })
    }

    /// Worksheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn sheet_name(&self) -> Result<String> {
        let names = self.workbook.sheet_names();
        match &self.sheet {
            Some(name) if names.contains(name) => Ok(name.clone()),
            Some(name) => Err(IngestError::SheetNotFound(name.clone())),
            None => names
                .into_iter()
                .next()
                .ok_or_else(|| IngestError::Workbook("workbook has no sheets".to_string())),
        }
    }
}

impl TableSource for WorkbookSource {
    fn read_table(&mut self, max_rows: usize) -> Result<RawTable> {
        let name = self.sheet_name()?;
        let range = self
            .workbook
            .worksheet_range(&name)
            .map_err(|e| IngestError::Workbook(format!("sheet {}: {}", name, e)))?;

        debug!("Reading sheet {:?} ({:?})", name, range.get_size());

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.iter().map(header_text).collect(),
            None => Vec::new(),
        };

        let rows = rows
            .take(max_rows)
            .map(|row| row.iter().map(to_cell).collect())
            .collect();

        Ok(RawTable::new(headers, rows))
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

fn to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Empty | Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
