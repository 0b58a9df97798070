//! Sales file loader
//!
//! Reads the whole input file, decodes it, and hands back the data lines.
//!
//! # Encoding
//!
//! Bytes are decoded as UTF-8 first. When that fails the file is decoded as
//! Windows-1252, the superset of Latin-1 that spreadsheet exports use, which
//! maps every byte to a char and therefore never fails. A leading UTF-8 byte
//! order mark is dropped.
//!
//! # Cleaning
//!
//! Each line is trimmed. Blank lines and the header row (any line starting
//! with `TransactionID`) are removed.

use crate::types::SalesError;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const HEADER_PREFIX: &str = "transactionid";
const UTF8_BOM: char = '\u{feff}';

/// Encoding the input file was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    /// Windows-1252, also covering plain Latin-1
    Windows1252,
}

/// Cleaned lines of an input file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub lines: Vec<String>,
    pub encoding: SourceEncoding,
}

/// Read `path` and return its cleaned data lines
///
/// # Errors
///
/// Returns [`SalesError::FileAccess`] if the file does not exist or cannot
/// be read. Decoding never fails.
pub fn load_lines(path: &Path) -> Result<LoadedFile, SalesError> {
    let bytes = fs::read(path).map_err(|e| SalesError::file_access(path, e))?;

    let (text, encoding) = decode(bytes);
    info!(path = %path.display(), ?encoding, "read sales file");

    let lines = clean_lines(&text);
    debug!(lines = lines.len(), "data lines after cleaning");

    Ok(LoadedFile { lines, encoding })
}

/// Decode raw bytes, falling back to Windows-1252 when they are not UTF-8
pub fn decode(bytes: Vec<u8>) -> (String, SourceEncoding) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, SourceEncoding::Utf8),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            (decoded.into_owned(), SourceEncoding::Windows1252)
        }
    }
}

/// Trim lines and drop blanks, the BOM and the header row
pub fn clean_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_header(line))
        .map(str::to_string)
        .collect()
}

fn is_header(line: &str) -> bool {
    line.get(..HEADER_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(HEADER_PREFIX))
}
