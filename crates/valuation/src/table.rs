use crate::error::ValuationError;
use core_types::{RawRow, RawTable};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// A forecast table indexed by metric name and fiscal year.
///
/// Every metric holds exactly one cell per year label, and year labels are
/// unique. Cells stay as text until a caller asks for a number, because
/// placeholders such as `-` are only an error for the metrics that are used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialTable {
    years: Vec<String>,
    metrics: BTreeMap<String, Vec<String>>,
}

impl FinancialTable {
    /// Builds a typed table from the provider's raw rows.
    ///
    /// At most one header row is skipped: the first row that has a blank
    /// label or whose cells repeat the year labels, or the very first row when
    /// none of its cells is numeric (e.g. `Fiscal Year | FY 2024 | FY 2025`).
    /// Every other row becomes a metric; when a label repeats, the later row
    /// replaces the earlier one.
    pub fn parse(raw: &RawTable) -> Result<Self, ValuationError> {
        if raw.years.is_empty() {
            return Err(ValuationError::MissingTable);
        }

        let mut seen = HashSet::with_capacity(raw.years.len());
        for year in &raw.years {
            if !seen.insert(year.as_str()) {
                return Err(ValuationError::DuplicateYear(year.clone()));
            }
        }

        let mut metrics = BTreeMap::new();
        let mut header_skipped = false;

        for (index, row) in raw.rows.iter().enumerate() {
            if !header_skipped && is_header_row(index, row, &raw.years) {
                header_skipped = true;
                tracing::trace!(label = %row.label, "Skipping header row");
                continue;
            }

            if row.cells.len() != raw.years.len() {
                return Err(ValuationError::MalformedRow {
                    label: row.label.clone(),
                    expected: raw.years.len(),
                    found: row.cells.len(),
                });
            }

            let label = row.label.trim().to_string();
            if metrics.insert(label, row.cells.clone()).is_some() {
                tracing::debug!(label = %row.label, "Duplicate metric row replaces earlier one");
            }
        }

        if metrics.is_empty() {
            return Err(ValuationError::MissingTable);
        }

        Ok(Self {
            years: raw.years.clone(),
            metrics,
        })
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    /// All cells for a metric, in year order.
    pub fn metric(&self, metric: &str) -> Result<&[String], ValuationError> {
        self.metrics
            .get(metric)
            .map(Vec::as_slice)
            .ok_or_else(|| ValuationError::missing_metric(metric, None))
    }

    pub fn year_index(&self, year: &str) -> Result<usize, ValuationError> {
        self.years
            .iter()
            .position(|y| y == year)
            .ok_or_else(|| ValuationError::MissingYear(year.to_string()))
    }

    /// The raw cell text for a metric in a given year.
    pub fn cell(&self, metric: &str, year: &str) -> Result<&str, ValuationError> {
        let cells = self.metric(metric)?;
        let index = self.year_index(year)?;
        Ok(cells[index].as_str())
    }

    /// The cell parsed as a number. Placeholder cells are reported as a
    /// missing metric for that year, never coerced to zero.
    pub fn number(&self, metric: &str, year: &str) -> Result<Decimal, ValuationError> {
        let text = self.cell(metric, year)?;
        parse_number(text).ok_or_else(|| ValuationError::missing_metric(metric, Some(year)))
    }
}

fn is_header_row(index: usize, row: &RawRow, years: &[String]) -> bool {
    let repeats_years = row.cells.len() == years.len()
        && row.cells.iter().zip(years).all(|(cell, year)| cell.trim() == year);
    let leading_text_row = index == 0
        && !row.cells.is_empty()
        && row.cells.iter().all(|cell| parse_number(cell).is_none());

    row.label.trim().is_empty() || repeats_years || leading_text_row
}

/// Parses scraped numeric text such as `"1,234.50"` or `" -0.42 "`.
fn parse_number(text: &str) -> Option<Decimal> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn forecast() -> RawTable {
        RawTable::new(
            strings(&["2023", "2024", "2025"]),
            vec![
                RawRow::new("Year", strings(&["2023", "2024", "2025"])),
                RawRow::new("Revenue", strings(&["383,285", "391,035", "412,870"])),
                RawRow::new("EPS", strings(&["6.13", "6.75", "7.40"])),
                RawRow::new("Forward PE", strings(&["-", "33.52", "30.57"])),
            ],
        )
    }

    #[test]
    fn header_row_is_excluded() {
        let table = FinancialTable::parse(&forecast()).unwrap();
        assert_eq!(table.years(), strings(&["2023", "2024", "2025"]).as_slice());
        for metric in ["EPS", "Forward PE", "Revenue"] {
            assert!(table.metric(metric).is_ok(), "{metric}");
        }
        assert!(table.metric("Year").is_err());
    }

    #[test]
    fn table_without_header_keeps_every_row() {
        let raw = RawTable::new(
            strings(&["2024", "2025"]),
            vec![
                RawRow::new("EPS", strings(&["5.00", "6.00"])),
                RawRow::new("Forward PE", strings(&["20", "18"])),
            ],
        );
        let table = FinancialTable::parse(&raw).unwrap();
        assert_eq!(table.metric("EPS").unwrap(), strings(&["5.00", "6.00"]).as_slice());
        assert_eq!(table.metric("Forward PE").unwrap(), strings(&["20", "18"]).as_slice());
    }

    #[test]
    fn blank_label_counts_as_header() {
        let raw = RawTable::new(
            strings(&["2024", "2025"]),
            vec![
                RawRow::new("", strings(&["FY", "FY"])),
                RawRow::new("EPS", strings(&["5.00", "6.00"])),
            ],
        );
        let table = FinancialTable::parse(&raw).unwrap();
        assert!(table.metric("EPS").is_ok());
        assert!(table.metric("").is_err());
    }

    #[test]
    fn leading_row_of_text_counts_as_header() {
        let raw = RawTable::new(
            strings(&["2024", "2025"]),
            vec![
                RawRow::new("Fiscal Year", strings(&["FY 2024", "FY 2025"])),
                RawRow::new("EPS", strings(&["5.00", "6.00"])),
            ],
        );
        let table = FinancialTable::parse(&raw).unwrap();
        assert!(table.metric("Fiscal Year").is_err());
        assert_eq!(table.number("EPS", "2025").unwrap(), dec!(6.00));
    }

    #[test]
    fn placeholder_row_after_the_first_is_kept() {
        let raw = RawTable::new(
            strings(&["2024", "2025"]),
            vec![
                RawRow::new("EPS", strings(&["5.00", "6.00"])),
                RawRow::new("Forward PE", strings(&["-", "-"])),
            ],
        );
        let table = FinancialTable::parse(&raw).unwrap();
        assert_eq!(table.cell("Forward PE", "2024").unwrap(), "-");
    }

    #[test]
    fn parsing_is_idempotent() {
        let raw = forecast();
        assert_eq!(
            FinancialTable::parse(&raw).unwrap(),
            FinancialTable::parse(&raw).unwrap()
        );
    }

    #[test]
    fn empty_payload_is_missing_table() {
        assert_eq!(
            FinancialTable::parse(&RawTable::default()),
            Err(ValuationError::MissingTable)
        );

        let header_only = RawTable::new(
            strings(&["2024"]),
            vec![RawRow::new("Year", strings(&["2024"]))],
        );
        assert_eq!(
            FinancialTable::parse(&header_only),
            Err(ValuationError::MissingTable)
        );
    }

    #[test]
    fn short_row_is_malformed() {
        let raw = RawTable::new(
            strings(&["2024", "2025"]),
            vec![RawRow::new("EPS", strings(&["5.00"]))],
        );
        assert_eq!(
            FinancialTable::parse(&raw),
            Err(ValuationError::MalformedRow {
                label: "EPS".to_string(),
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn repeated_year_label_is_rejected() {
        let raw = RawTable::new(
            strings(&["2024", "2024"]),
            vec![RawRow::new("EPS", strings(&["5.00", "6.00"]))],
        );
        assert_eq!(
            FinancialTable::parse(&raw),
            Err(ValuationError::DuplicateYear("2024".to_string()))
        );
    }

    #[test]
    fn later_duplicate_metric_wins() {
        let raw = RawTable::new(
            strings(&["2024", "2025"]),
            vec![
                RawRow::new("EPS", strings(&["1.00", "2.00"])),
                RawRow::new("EPS", strings(&["5.00", "6.00"])),
            ],
        );
        let table = FinancialTable::parse(&raw).unwrap();
        assert_eq!(table.number("EPS", "2024").unwrap(), dec!(5.00));
    }

    #[test]
    fn numbers_are_parsed_and_placeholders_rejected() {
        let table = FinancialTable::parse(&forecast()).unwrap();
        assert_eq!(table.number("Revenue", "2024").unwrap(), dec!(391035));
        assert_eq!(table.number("Forward PE", "2025").unwrap(), dec!(30.57));
        assert_eq!(
            table.number("Forward PE", "2023"),
            Err(ValuationError::MissingMetric {
                metric: "Forward PE".to_string(),
                year: Some("2023".to_string()),
            })
        );
    }

    #[test]
    fn lookups_report_what_is_missing() {
        let table = FinancialTable::parse(&forecast()).unwrap();
        assert_eq!(
            table.cell("Dividend", "2024"),
            Err(ValuationError::MissingMetric {
                metric: "Dividend".to_string(),
                year: None,
            })
        );
        assert_eq!(
            table.cell("EPS", "2026"),
            Err(ValuationError::MissingYear("2026".to_string()))
        );
    }

    #[test]
    fn parse_number_handles_scraped_text() {
        assert_eq!(parse_number(" -0.42 "), Some(dec!(-0.42)));
        assert_eq!(parse_number("1,234.50"), Some(dec!(1234.50)));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
    }
}
