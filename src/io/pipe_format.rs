//! Pipe-delimited sales format
//!
//! This module centralizes all format concerns for the `|`-delimited files:
//! - Field cleaning (thousands separators, punctuation noise)
//! - Line → [`Transaction`] conversion with validation
//! - Enriched transaction output serialization
//!
//! # Layouts
//!
//! Two column orders are recognized by field count:
//!
//! | fields | columns |
//! |--------|---------|
//! | 9 | id, date, region, product_id, product_name, customer_id, quantity, unit_price, total_amount |
//! | 8 | id, date, product_id, product_name, quantity, unit_price, customer_id, region |
//!
//! The stored total is always quantity × unit_price. A declared total that
//! disagrees is replaced and flagged as [`TotalStatus::Corrected`].

use crate::io::create_parent_dir;
use crate::types::{EnrichedTransaction, SalesError, TotalStatus, Transaction, ValidationError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Field delimiter for input and output files
pub const DELIMITER: char = '|';

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column order of an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// 9 fields, region third, declared total last
    Standard,
    /// 8 fields, region last, no total
    Legacy,
}

impl RecordLayout {
    fn from_field_count(count: usize) -> Option<Self> {
        match count {
            9 => Some(RecordLayout::Standard),
            8 => Some(RecordLayout::Legacy),
            _ => None,
        }
    }
}

/// Raw fields of one line, in a layout-independent order
struct RawFields<'a> {
    id: &'a str,
    date: &'a str,
    region: &'a str,
    product_id: &'a str,
    product_name: &'a str,
    customer_id: &'a str,
    quantity: &'a str,
    unit_price: &'a str,
    total_amount: Option<&'a str>,
}

impl<'a> RawFields<'a> {
    fn split(line: &'a str) -> Result<Self, ValidationError> {
        let f: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();

        match RecordLayout::from_field_count(f.len()) {
            Some(RecordLayout::Standard) => Ok(RawFields {
                id: f[0],
                date: f[1],
                region: f[2],
                product_id: f[3],
                product_name: f[4],
                customer_id: f[5],
                quantity: f[6],
                unit_price: f[7],
                total_amount: Some(f[8]),
            }),
            Some(RecordLayout::Legacy) => Ok(RawFields {
                id: f[0],
                date: f[1],
                product_id: f[2],
                product_name: f[3],
                quantity: f[4],
                unit_price: f[5],
                customer_id: f[6],
                region: f[7],
                total_amount: None,
            }),
            None => Err(ValidationError::FieldCount { found: f.len() }),
        }
    }
}

/// A record that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// 1-based position among the data lines
    pub record: usize,
    pub reason: ValidationError,
}

/// Result of parsing a batch of lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    /// Valid transactions in file order
    pub transactions: Vec<Transaction>,
    pub rejections: Vec<Rejection>,
    /// Accepted records whose declared total was replaced
    pub corrected_totals: usize,
}

impl ParseOutcome {
    pub fn invalid_count(&self) -> usize {
        self.rejections.len()
    }
}

/// Remove thousands separators and stray spaces from a numeric field
pub fn clean_numeric(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect()
}

/// Remove commas and double quotes from a text field
pub fn clean_text(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != ',' && *c != '"')
        .collect::<String>()
        .trim()
        .to_string()
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::MissingField { field })
    } else {
        Ok(value)
    }
}

fn identifier(value: &str, field: &'static str, prefix: char) -> Result<String, ValidationError> {
    let value = required(value, field)?;
    if !value.starts_with(prefix) {
        return Err(ValidationError::InvalidIdentifier {
            field,
            value: value.to_string(),
            prefix,
        });
    }
    Ok(value.to_string())
}

fn parse_quantity(raw: &str) -> Result<u32, ValidationError> {
    let cleaned = clean_numeric(required(raw, "quantity")?);
    let value = i64::from_str(&cleaned).map_err(|_| ValidationError::InvalidNumber {
        field: "quantity",
        value: cleaned.clone(),
    })?;

    if value <= 0 {
        return Err(ValidationError::NonPositive {
            field: "quantity",
            value: cleaned,
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::InvalidNumber {
        field: "quantity",
        value: cleaned,
    })
}

fn parse_decimal(raw: &str, field: &'static str) -> Result<Decimal, ValidationError> {
    let cleaned = clean_numeric(required(raw, field)?);
    Decimal::from_str(&cleaned).map_err(|_| ValidationError::InvalidNumber {
        field,
        value: cleaned,
    })
}

fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let price = parse_decimal(raw, "unit price")?;
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositive {
            field: "unit price",
            value: price.to_string(),
        });
    }
    Ok(price)
}

/// Convert one data line into a validated [`Transaction`]
///
/// # Errors
///
/// Returns the first [`ValidationError`] the line violates.
pub fn parse_line(line: &str) -> Result<Transaction, ValidationError> {
    let raw = RawFields::split(line)?;

    let id = identifier(raw.id, "transaction id", 'T')?;

    let date_text = required(raw.date, "date")?;
    let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            value: date_text.to_string(),
        }
    })?;

    let region = required(raw.region, "region")?.to_string();
    let product_id = identifier(raw.product_id, "product id", 'P')?;
    let product_name = clean_text(raw.product_name);
    required(&product_name, "product name")?;
    let customer_id = identifier(raw.customer_id, "customer id", 'C')?;

    let quantity = parse_quantity(raw.quantity)?;
    let unit_price = parse_price(raw.unit_price)?;

    let total_amount = unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(ValidationError::AmountOverflow { quantity })?;

    let total_status = match raw.total_amount {
        None => TotalStatus::Computed,
        Some(declared) => {
            let declared = parse_decimal(declared, "total amount")?;
            if declared == total_amount {
                TotalStatus::Matched
            } else {
                TotalStatus::Corrected { declared }
            }
        }
    };

    Ok(Transaction {
        id,
        date,
        region,
        product_id,
        product_name,
        customer_id,
        quantity,
        unit_price,
        total_amount,
        total_status,
    })
}

/// Parse and validate every line, keeping file order
///
/// Invalid lines are logged and counted; they never stop the batch.
pub fn parse_transactions<S: AsRef<str>>(lines: &[S]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (index, line) in lines.iter().enumerate() {
        let record = index + 1;
        match parse_line(line.as_ref()) {
            Ok(transaction) => {
                if let TotalStatus::Corrected { declared } = transaction.total_status {
                    debug!(
                        record,
                        id = %transaction.id,
                        %declared,
                        computed = %transaction.total_amount,
                        "declared total replaced"
                    );
                    outcome.corrected_totals += 1;
                }
                outcome.transactions.push(transaction);
            }
            Err(reason) => {
                warn!(record, %reason, "skipping invalid record");
                outcome.rejections.push(Rejection { record, reason });
            }
        }
    }

    outcome
}

/// Output row for the enriched data file
///
/// Field order is the column order; serde renames give the header.
#[derive(Debug, Serialize)]
struct EnrichedRow<'a> {
    #[serde(rename = "TransactionID")]
    id: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Region")]
    region: &'a str,
    #[serde(rename = "ProductID")]
    product_id: &'a str,
    #[serde(rename = "ProductName")]
    product_name: &'a str,
    #[serde(rename = "CustomerID")]
    customer_id: &'a str,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "UnitPrice")]
    unit_price: String,
    #[serde(rename = "TotalAmount")]
    total_amount: String,
    #[serde(rename = "API_ProductName")]
    api_product_name: Option<&'a str>,
    #[serde(rename = "API_Category")]
    api_category: Option<&'a str>,
    #[serde(rename = "API_Brand")]
    api_brand: Option<&'a str>,
    #[serde(rename = "API_Price")]
    api_price: Option<String>,
    #[serde(rename = "API_Rating")]
    api_rating: Option<String>,
    #[serde(rename = "API_Match")]
    api_match: bool,
}

impl<'a> From<&'a EnrichedTransaction> for EnrichedRow<'a> {
    fn from(enriched: &'a EnrichedTransaction) -> Self {
        let tx = &enriched.transaction;
        EnrichedRow {
            id: &tx.id,
            date: tx.date.format(DATE_FORMAT).to_string(),
            region: &tx.region,
            product_id: &tx.product_id,
            product_name: &tx.product_name,
            customer_id: &tx.customer_id,
            quantity: tx.quantity,
            unit_price: tx.unit_price.to_string(),
            total_amount: tx.total_amount.to_string(),
            api_product_name: enriched.api_product_name.as_deref(),
            api_category: enriched.api_category.as_deref(),
            api_brand: enriched.api_brand.as_deref(),
            api_price: enriched.api_price.map(|p| p.to_string()),
            api_rating: enriched.api_rating.map(|r| r.to_string()),
            api_match: enriched.api_match,
        }
    }
}

/// Write enriched transactions as pipe-delimited text with a header row
///
/// # Errors
///
/// Returns a message describing the write failure.
pub fn write_enriched(
    transactions: &[EnrichedTransaction],
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER as u8)
        .from_writer(output);

    for enriched in transactions {
        writer
            .serialize(EnrichedRow::from(enriched))
            .map_err(|e| format!("Failed to write enriched record: {}", e))?;
    }

    if transactions.is_empty() {
        writer
            .write_record(ENRICHED_HEADER)
            .map_err(|e| format!("Failed to write header: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Header of the enriched data file
pub const ENRICHED_HEADER: [&str; 15] = [
    "TransactionID",
    "Date",
    "Region",
    "ProductID",
    "ProductName",
    "CustomerID",
    "Quantity",
    "UnitPrice",
    "TotalAmount",
    "API_ProductName",
    "API_Category",
    "API_Brand",
    "API_Price",
    "API_Rating",
    "API_Match",
];

/// Write enriched transactions to `path`, replacing any existing file
///
/// Parent directories are created as needed.
pub fn save_enriched(path: &Path, transactions: &[EnrichedTransaction]) -> Result<(), SalesError> {
    create_parent_dir(path)?;
    let file = File::create(path).map_err(|e| SalesError::file_access(path, e))?;
    let mut output = BufWriter::new(file);

    write_enriched(transactions, &mut output).map_err(|e| SalesError::file_access(path, e))?;
    output.flush().map_err(|e| SalesError::file_access(path, e))
}
