// Runtime configuration, read from the environment.
//
// DASHBOARD_WORKBOOK    workbook path (xlsx/xls/ods) or a directory of
//                       `<sheet>.csv` files; default `strategic_insight.xlsx`
// DASHBOARD_OUTPUT_DIR  where report JSON/CSV exports go; default `.`
use crate::loader::{CsvDirSource, TableSource, WorkbookSource};
use std::path::PathBuf;

pub const WORKBOOK_VAR: &str = "DASHBOARD_WORKBOOK";
pub const OUTPUT_DIR_VAR: &str = "DASHBOARD_OUTPUT_DIR";
pub const DEFAULT_WORKBOOK: &str = "strategic_insight.xlsx";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub workbook: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config { workbook: PathBuf::from(DEFAULT_WORKBOOK), output_dir: PathBuf::from(".") }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();
        Config {
            workbook: get(WORKBOOK_VAR).map(PathBuf::from).unwrap_or(defaults.workbook),
            output_dir: get(OUTPUT_DIR_VAR).map(PathBuf::from).unwrap_or(defaults.output_dir),
        }
    }

    /// A directory selects the CSV source, anything else is opened as a workbook.
    pub fn source(&self) -> Box<dyn TableSource> {
        if self.workbook.is_dir() {
            Box::new(CsvDirSource::new(&self.workbook))
        } else {
            Box::new(WorkbookSource::new(&self.workbook))
        }
    }
}
