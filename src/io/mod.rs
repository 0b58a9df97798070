//! I/O module
//!
//! Handles reading the sales file and writing both outputs.
//!
//! # Components
//!
//! - `loader` - Encoding-tolerant line loading
//! - `pipe_format` - `|`-delimited record parsing and enriched output
//! - `report` - Eight-section text report

pub mod loader;
pub mod pipe_format;
pub mod report;

pub use loader::{load_lines, LoadedFile, SourceEncoding};
pub use pipe_format::{parse_line, parse_transactions, save_enriched, write_enriched, ParseOutcome};
pub use report::{save_report, write_report, ReportContext};

use crate::types::SalesError;
use std::fs;
use std::path::Path;

/// Create the directory that will hold `path`, if it has one
pub(crate) fn create_parent_dir(path: &Path) -> Result<(), SalesError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| SalesError::file_access(parent, e))
        }
        _ => Ok(()),
    }
}
