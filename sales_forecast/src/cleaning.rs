//! Raw sales export cleaning
//!
//! Turns a raw transaction export into the cleaned table the forecast and
//! dashboard read:
//!
//! 1. drop duplicate rows (first occurrence wins); numeric cells compare by
//!    value, so `20` and `20.0` match
//! 2. parse `date` (mixed formats, month first) and rewrite it as ISO; a
//!    blank date stays blank
//! 3. stable sort by date, oldest first, blank dates last
//! 4. fill blank `transaction_type` cells with a default
//! 5. derive `total_price = item_price * quantity`
//!
//! Steps 4 and 5 are skipped, with a warning, when their columns are absent.

use crate::config::{DATE_COLUMN, TOTAL_PRICE_COLUMN};
use crate::data::{parse_sale_date, TRANSACTION_TYPE_COLUMN};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

pub const ITEM_PRICE_COLUMN: &str = "item_price";
pub const QUANTITY_COLUMN: &str = "quantity";

/// Knobs for [`clean_sales`]
#[derive(Debug, Clone)]
pub struct CleaningOptions {
    /// Value written into blank `transaction_type` cells
    pub default_transaction_type: String,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            default_transaction_type: "Credit card".to_string(),
        }
    }
}

/// What cleaning changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub duplicates_removed: usize,
    pub transaction_types_filled: usize,
    pub total_price_derived: bool,
    pub rows_written: usize,
}

/// Cleaned rows with their header
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSales {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CleanedSales {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of `row` under `column`, if both exist
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = column_index(&self.headers, column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Write as CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(&self.headers)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Clean a raw CSV stream
pub fn clean_sales<R: Read>(reader: R, options: &CleaningOptions) -> Result<(CleanedSales, CleaningReport)> {
    let mut input = csv::Reader::from_reader(reader);
    let mut headers: Vec<String> = input.headers()?.iter().map(|h| h.to_string()).collect();

    let mut report = CleaningReport::default();
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for record in input.records() {
        let row: Vec<String> = record?.iter().map(|f| f.to_string()).collect();
        report.rows_read += 1;
        if seen.insert(dedupe_key(&row)) {
            rows.push(row);
        } else {
            report.duplicates_removed += 1;
        }
    }

    let date_idx = column_index(&headers, DATE_COLUMN)
        .ok_or_else(|| ForecastError::MissingColumn(DATE_COLUMN.to_string()))?;

    let mut dated: Vec<(Option<NaiveDate>, Vec<String>)> = Vec::with_capacity(rows.len());
    for (line, mut row) in rows.into_iter().enumerate() {
        let raw = row[date_idx].trim();
        let date = if raw.is_empty() {
            None
        } else {
            let date = parse_sale_date(raw).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Unparseable date '{}' in data row {}",
                    raw,
                    line + 1
                ))
            })?;
            Some(date)
        };
        row[date_idx] = date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        dated.push((date, row));
    }

    let undated = dated.iter().filter(|(date, _)| date.is_none()).count();
    if undated > 0 {
        warn!(rows = undated, "rows without a date kept at the end");
    }

    // sort_by_key is stable: same-day rows keep their file order
    dated.sort_by_key(|(date, _)| (date.is_none(), *date));
    let mut rows: Vec<Vec<String>> = dated.into_iter().map(|(_, row)| row).collect();

    match column_index(&headers, TRANSACTION_TYPE_COLUMN) {
        Some(idx) => {
            for row in rows.iter_mut() {
                if row[idx].trim().is_empty() {
                    row[idx] = options.default_transaction_type.clone();
                    report.transaction_types_filled += 1;
                }
            }
            info!(
                filled = report.transaction_types_filled,
                default = %options.default_transaction_type,
                "filled missing transaction types"
            );
        }
        None => warn!("column '{}' not found in dataset", TRANSACTION_TYPE_COLUMN),
    }

    match (
        column_index(&headers, ITEM_PRICE_COLUMN),
        column_index(&headers, QUANTITY_COLUMN),
    ) {
        (Some(price_idx), Some(qty_idx)) => {
            let total_idx = match column_index(&headers, TOTAL_PRICE_COLUMN) {
                Some(idx) => idx,
                None => {
                    headers.push(TOTAL_PRICE_COLUMN.to_string());
                    for row in rows.iter_mut() {
                        row.push(String::new());
                    }
                    headers.len() - 1
                }
            };
            for row in rows.iter_mut() {
                row[total_idx] = line_total(&row[price_idx], &row[qty_idx])
                    .map(|v| v.to_string())
                    .unwrap_or_default();
            }
            report.total_price_derived = true;
        }
        _ => warn!(
            "columns '{}' or '{}' not found in dataset",
            ITEM_PRICE_COLUMN, QUANTITY_COLUMN
        ),
    }

    report.rows_written = rows.len();
    Ok((CleanedSales { headers, rows }, report))
}

/// Clean `input` and write the result to `output`
pub fn clean_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &CleaningOptions,
) -> Result<CleaningReport> {
    let input = input.as_ref();
    let output = output.as_ref();
    if !input.exists() {
        return Err(ForecastError::IoError(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Input file not found: {}", input.display()),
        )));
    }

    let (cleaned, report) = clean_sales(File::open(input)?, options)?;
    info!(
        rows_read = report.rows_read,
        duplicates_removed = report.duplicates_removed,
        "cleaned raw sales"
    );

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    cleaned.write_csv(File::create(output)?)?;
    info!(path = %output.display(), rows = report.rows_written, "processed dataset saved");

    Ok(report)
}

fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// Row identity for deduplication: numeric cells by value, others verbatim
fn dedupe_key(row: &[String]) -> Vec<String> {
    row.iter()
        .map(|cell| match cell.trim().parse::<f64>() {
            Ok(v) => v.to_string(),
            Err(_) => cell.clone(),
        })
        .collect()
}

fn line_total(price: &str, quantity: &str) -> Option<f64> {
    let price: f64 = price.trim().parse().ok()?;
    let quantity: f64 = quantity.trim().parse().ok()?;
    Some(price * quantity)
}
