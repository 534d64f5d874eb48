use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single scraped table row: the row label and its cells, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub label: String,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(label: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            label: label.into(),
            cells,
        }
    }
}

/// Forecast table content exactly as the data provider delivered it.
///
/// Nothing here is validated; shape checks happen when the table is parsed
/// into a typed form by the valuation crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Fiscal year labels (e.g. "2024"), positionally aligned with each row's cells.
    pub years: Vec<String>,
    /// Rows in document order. A header row may be among them.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(years: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { years, rows }
    }
}

/// Everything the valuation pipeline needs to know about one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub table: RawTable,
    /// Label/value pairs from the overview page, in document order.
    pub key_values: Vec<(String, String)>,
    pub current_price: Decimal,
    /// `None` means the company pays no dividend.
    pub annual_dividend: Option<Decimal>,
    pub retrieved_at: DateTime<Utc>,
}
