//! Aggregates shown on the report

use sales_forecast::SaleRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals for a filtered set of rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    /// Sum of every known `total_price`
    pub total_sales: f64,
    /// Rows the totals were computed from
    pub rows: usize,
    /// `(item type, total)` ordered by item type
    pub by_item_type: Vec<(String, f64)>,
}

impl SalesSummary {
    pub fn from_records(records: &[SaleRecord]) -> Self {
        Self {
            total_sales: total_sales(records),
            rows: records.len(),
            by_item_type: sales_by_item_type(records),
        }
    }
}

/// Sum of `total_price`, ignoring missing prices
pub fn total_sales(records: &[SaleRecord]) -> f64 {
    records.iter().filter_map(|r| r.total_price).sum()
}

/// Total sales per item type, sorted by item type.
///
/// Rows without an item type are left out; an item type whose prices are all
/// missing totals 0.
pub fn sales_by_item_type(records: &[SaleRecord]) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        if let Some(item_type) = record.item_type.as_deref() {
            *totals.entry(item_type).or_insert(0.0) += record.total_price.unwrap_or(0.0);
        }
    }
    totals
        .into_iter()
        .map(|(item_type, total)| (item_type.to_string(), total))
        .collect()
}

/// `1234567.891` → `1,234,567.89`
pub fn format_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Money amount with a currency prefix, e.g. `₹1,234.50`
pub fn format_currency(value: f64, symbol: &str) -> String {
    format!("{}{}", symbol, format_thousands(value))
}
