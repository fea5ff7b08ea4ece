// Error types for loading sheets.
//
// These never reach a report: `TableSource::load` logs them and hands back
// an empty table instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("workbook not found: {0}")]
    WorkbookMissing(PathBuf),

    #[error("cannot open workbook {path}: {message}")]
    WorkbookOpen { path: PathBuf, message: String },

    #[error("cannot read sheet '{sheet}': {message}")]
    SheetRead { sheet: String, message: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;
