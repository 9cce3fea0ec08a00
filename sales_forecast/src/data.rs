//! Sales table handling

use crate::config::{DATE_COLUMN, TOTAL_PRICE_COLUMN};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Optional pass-through columns of a cleaned sales table
pub const ITEM_NAME_COLUMN: &str = "item_name";
pub const ITEM_TYPE_COLUMN: &str = "item_type";
pub const TIME_OF_SALE_COLUMN: &str = "time_of_sale";
pub const TRANSACTION_TYPE_COLUMN: &str = "transaction_type";

/// One sale event from a cleaned sales table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub total_price: Option<f64>,
    pub item_name: Option<String>,
    pub item_type: Option<String>,
    pub time_of_sale: Option<String>,
    pub transaction_type: Option<String>,
}

impl SaleRecord {
    /// A record carrying only the columns the forecast needs
    pub fn new(date: NaiveDate, total_price: f64) -> Self {
        Self {
            date,
            total_price: Some(total_price),
            item_name: None,
            item_type: None,
            time_of_sale: None,
            transaction_type: None,
        }
    }
}

/// Cleaned sales data backed by a polars `DataFrame`
#[derive(Debug, Clone)]
pub struct SalesTable {
    df: DataFrame,
}

/// Loader for cleaned sales tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a cleaned sales table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesTable> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        debug!(path = %path.display(), rows = df.height(), "loaded sales table");
        Ok(SalesTable { df })
    }

    /// Wrap an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> SalesTable {
        SalesTable { df }
    }
}

impl SalesTable {
    /// Build a table from in-memory records
    pub fn from_records(records: &[SaleRecord]) -> Result<Self> {
        let dates: Vec<String> = records
            .iter()
            .map(|r| r.date.format("%Y-%m-%d").to_string())
            .collect();
        let prices: Vec<Option<f64>> = records.iter().map(|r| r.total_price).collect();

        let df = DataFrame::new(vec![
            Series::new(DATE_COLUMN, dates),
            Series::new(ITEM_NAME_COLUMN, text_values(records, |r| r.item_name.clone())),
            Series::new(ITEM_TYPE_COLUMN, text_values(records, |r| r.item_type.clone())),
            Series::new(TIME_OF_SALE_COLUMN, text_values(records, |r| r.time_of_sale.clone())),
            Series::new(
                TRANSACTION_TYPE_COLUMN,
                text_values(records, |r| r.transaction_type.clone()),
            ),
            Series::new(TOTAL_PRICE_COLUMN, prices),
        ])?;

        Ok(Self { df })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().iter().any(|c| *c == name)
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Pair each row's calendar date with its amount.
    ///
    /// Rows with a null date are skipped; a date that cannot be parsed is a
    /// `DataError`. Null amounts are kept as `None`.
    pub fn dated_values(
        &self,
        date_column: &str,
        value_column: &str,
    ) -> Result<Vec<(NaiveDate, Option<f64>)>> {
        let dates = self.date_column(date_column)?;
        let values = self.column_as_f64(value_column)?;

        Ok(dates
            .into_iter()
            .zip(values)
            .filter_map(|(date, value)| date.map(|d| (d, value)))
            .collect())
    }

    /// Convert every row into a [`SaleRecord`]. Missing optional columns
    /// become `None`; `date` and `total_price` are required.
    pub fn records(&self) -> Result<Vec<SaleRecord>> {
        let dates = self.date_column(DATE_COLUMN)?;
        // a table without prices still lists its sales; totals come out as 0
        let prices = if self.has_column(TOTAL_PRICE_COLUMN) {
            self.column_as_f64(TOTAL_PRICE_COLUMN)?
        } else {
            vec![None; self.df.height()]
        };
        let item_names = self.optional_text_column(ITEM_NAME_COLUMN)?;
        let item_types = self.optional_text_column(ITEM_TYPE_COLUMN)?;
        let times = self.optional_text_column(TIME_OF_SALE_COLUMN)?;
        let transactions = self.optional_text_column(TRANSACTION_TYPE_COLUMN)?;

        let mut records = Vec::with_capacity(dates.len());
        for (i, date) in dates.into_iter().enumerate() {
            let Some(date) = date else {
                continue;
            };
            records.push(SaleRecord {
                date,
                total_price: prices[i],
                item_name: item_names[i].clone(),
                item_type: item_types[i].clone(),
                time_of_sale: times[i].clone(),
                transaction_type: transactions[i].clone(),
            });
        }

        Ok(records)
    }

    fn require(&self, name: &str) -> Result<&Series> {
        self.df
            .column(name)
            .map_err(|_| ForecastError::MissingColumn(name.to_string()))
    }

    /// Parse a column of dates; any dtype is rendered to text first
    fn date_column(&self, name: &str) -> Result<Vec<Option<NaiveDate>>> {
        let text = self.text_column(self.require(name)?)?;

        text.into_iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => parse_sale_date(&s).map(Some).ok_or_else(|| {
                    ForecastError::DataError(format!(
                        "Unparseable date '{}' in column '{}' at row {}",
                        s, name, row
                    ))
                }),
            })
            .collect()
    }

    /// Helper method to get a column as f64 values (nulls preserved)
    fn column_as_f64(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let col = self.require(name)?;
        let cast = col.cast(&DataType::Float64).map_err(|e| {
            ForecastError::DataError(format!("Column '{}' cannot be converted to f64: {}", name, e))
        })?;
        Ok(cast.f64()?.into_iter().collect())
    }

    fn optional_text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        match self.df.column(name) {
            Ok(col) => self.text_column(col),
            Err(_) => Ok(vec![None; self.df.height()]),
        }
    }

    fn text_column(&self, col: &Series) -> Result<Vec<Option<String>>> {
        let cast = col.cast(&DataType::Utf8)?;
        Ok(cast
            .utf8()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect())
    }
}

fn text_values(
    records: &[SaleRecord],
    pick: impl Fn(&SaleRecord) -> Option<String>,
) -> Vec<Option<String>> {
    records.iter().map(pick).collect()
}

/// Parse a sale date written in any of the formats seen in raw exports.
///
/// Accepts ISO (`2022-08-23`, `2022/08/23`) and month-first forms
/// (`8/23/2022`, `07-03-2022`, `8/23/22`). A trailing time of day is ignored.
/// When the first field cannot be a month but the second can, the two are
/// swapped (`23/8/2022` reads as 23 August).
pub fn parse_sale_date(input: &str) -> Option<NaiveDate> {
    let date_part = input
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()?;

    let sep = if date_part.contains('-') {
        '-'
    } else if date_part.contains('/') {
        '/'
    } else if date_part.contains('.') {
        '.'
    } else {
        return None;
    };

    let fields: Vec<&str> = date_part.split(sep).collect();
    if fields.len() != 3 || fields.iter().any(|f| f.is_empty()) {
        return None;
    }

    let nums: Vec<u32> = fields
        .iter()
        .map(|f| f.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    if fields[0].len() == 4 {
        return NaiveDate::from_ymd_opt(nums[0] as i32, nums[1], nums[2]);
    }

    let year = match fields[2].len() {
        4 => nums[2] as i32,
        1 | 2 => 2000 + nums[2] as i32,
        _ => return None,
    };

    let (month, day) = if nums[0] > 12 && nums[1] <= 12 {
        (nums[1], nums[0])
    } else {
        (nums[0], nums[1])
    };

    NaiveDate::from_ymd_opt(year, month, day)
}
