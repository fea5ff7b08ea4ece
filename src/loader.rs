// Table sources.
//
// A source turns a sheet name into a `RawTable`. Sources re-read their
// backing store on every call: there is no cache, so an edited workbook is
// picked up on the next report. Any failure becomes an empty table plus a
// warning in the log.
use crate::error::{Result, SourceError};
use crate::types::{Cell, RawRecord, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

pub trait TableSource {
    /// Fallible read. `Ok(RawTable::empty())` for a sheet that does not exist.
    fn try_load(&self, sheet: &str) -> Result<RawTable>;

    /// Read a sheet, degrading every error to an empty table.
    fn load(&self, sheet: &str) -> RawTable {
        match self.try_load(sheet) {
            Ok(table) => {
                debug!(sheet, rows = table.len(), columns = table.columns.len(), "sheet loaded");
                table
            }
            Err(e) => {
                warn!(sheet, error = %e, "sheet unavailable, using empty table");
                RawTable::empty()
            }
        }
    }
}

/// Excel/ODS workbook read through calamine.
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    path: PathBuf,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for WorkbookSource {
    fn try_load(&self, sheet: &str) -> Result<RawTable> {
        if !self.path.exists() {
            return Err(SourceError::WorkbookMissing(self.path.clone()));
        }
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| SourceError::WorkbookOpen {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        if !workbook.sheet_names().iter().any(|n| n == sheet) {
            debug!(sheet, "sheet not present in workbook");
            return Ok(RawTable::empty());
        }
        let range = workbook.worksheet_range(sheet).map_err(|e| SourceError::SheetRead {
            sheet: sheet.to_string(),
            message: e.to_string(),
        })?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(RawTable::empty());
        };
        let headers: Vec<String> = header_row.iter().map(data_to_cell).map(|c| header_text(&c)).collect();
        let body: Vec<Vec<Cell>> = rows.map(|r| r.iter().map(data_to_cell).collect()).collect();
        Ok(build_table(headers, body))
    }
}

fn data_to_cell(d: &Data) -> Cell {
    match d {
        Data::Empty => Cell::Blank,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Cell::Text(ndt.format("%Y-%m-%d").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Blank,
    }
}

fn header_text(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Blank => String::new(),
    }
}

/// Directory of `<sheet>.csv` files, one per sheet.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TableSource for CsvDirSource {
    fn try_load(&self, sheet: &str) -> Result<RawTable> {
        let path = self.dir.join(format!("{}.csv", sheet));
        if !path.exists() {
            debug!(sheet, path = %path.display(), "csv sheet not present");
            return Ok(RawTable::empty());
        }
        let mut rdr = ReaderBuilder::new().flexible(true).from_path(&path)?;
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut body = Vec::new();
        for result in rdr.records() {
            let record = result?;
            body.push(
                record
                    .iter()
                    .map(|v| if v.is_empty() { Cell::Blank } else { Cell::text(v) })
                    .collect(),
            );
        }
        Ok(build_table(headers, body))
    }
}

/// Fixed tables held in memory. Unknown sheets load as empty.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: HashMap<String, RawTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: &str, table: RawTable) -> Self {
        self.sheets.insert(name.to_string(), table);
        self
    }
}

impl TableSource for MemorySource {
    fn try_load(&self, sheet: &str) -> Result<RawTable> {
        Ok(self.sheets.get(sheet).cloned().unwrap_or_default())
    }
}

/// Shared header/row assembly: blank headers become `Unnamed: {i}`,
/// duplicates get a `.N` suffix, ragged rows are padded and fully blank rows
/// are dropped.
fn build_table(headers: Vec<String>, body: Vec<Vec<Cell>>) -> RawTable {
    let mut columns: Vec<String> = Vec::with_capacity(headers.len());
    for (i, h) in headers.into_iter().enumerate() {
        let base = if h.trim().is_empty() { format!("Unnamed: {}", i) } else { h };
        let mut name = base.clone();
        let mut n = 1;
        while columns.contains(&name) {
            name = format!("{}.{}", base, n);
            n += 1;
        }
        columns.push(name);
    }

    let rows: Vec<RawRecord> = body
        .into_iter()
        .filter(|cells| cells.iter().any(|c| !c.is_blank()))
        .map(|cells| {
            let mut it = cells.into_iter();
            columns
                .iter()
                .map(|c| (c.clone(), it.next().unwrap_or_default()))
                .collect()
        })
        .collect();
    RawTable { columns, rows }
}
