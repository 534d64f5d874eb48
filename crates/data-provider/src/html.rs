//! Pure extraction of raw values from fetched pages.
//!
//! Nothing here interprets the numbers beyond what is needed to read them;
//! shape checks belong to the valuation crate.

use crate::error::ProviderError;
use core_types::{RawRow, RawTable};
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;

fn selector(css: &str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| ProviderError::Selector(format!("{css}: {e:?}")))
}

/// Element text with runs of whitespace collapsed to single spaces.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_money(what: &str, text: &str) -> Result<Decimal, ProviderError> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    Decimal::from_str(&cleaned).map_err(|_| ProviderError::InvalidNumber {
        what: what.to_string(),
        text: text.to_string(),
    })
}

/// The current share price from the first element matching `price_css`.
pub fn extract_price(document: &Html, price_css: &str) -> Result<Decimal, ProviderError> {
    let sel = selector(price_css)?;
    let element = document
        .select(&sel)
        .next()
        .ok_or_else(|| ProviderError::MissingElement(format!("price ({price_css})")))?;
    parse_money("current price", &text_of(element))
}

/// Collects every forecast table matching `table_css` into one raw table.
///
/// Year labels come from the first table's header cells, minus the leading
/// row-label column. The header is also kept as the first raw row; body rows
/// of all tables follow in document order.
pub fn extract_forecast_table(document: &Html, table_css: &str) -> Result<RawTable, ProviderError> {
    let table_sel = selector(table_css)?;
    let tr = selector("tr")?;
    let th = selector("th")?;
    let td = selector("td")?;

    let mut raw = RawTable::default();
    let mut found_table = false;

    for table in document.select(&table_sel) {
        found_table = true;

        for row in table.select(&tr) {
            let headers: Vec<String> = row.select(&th).map(text_of).collect();
            if !headers.is_empty() {
                if raw.years.is_empty() && headers.len() > 1 {
                    raw.years = headers[1..].to_vec();
                    raw.rows.push(RawRow::new(headers[0].clone(), headers[1..].to_vec()));
                }
                continue;
            }

            let mut cells = row.select(&td).map(text_of);
            if let Some(label) = cells.next() {
                raw.rows.push(RawRow::new(label, cells.collect()));
            }
        }
    }

    if !found_table {
        return Err(ProviderError::MissingElement(format!(
            "forecast table ({table_css})"
        )));
    }

    tracing::debug!(
        years = ?raw.years,
        rows = raw.rows.len(),
        "Extracted forecast table"
    );
    Ok(raw)
}

/// The annual dividend from the first `dividend_css` element showing a dollar
/// amount. `None` means the page shows no dividend at all.
pub fn extract_dividend(
    document: &Html,
    dividend_css: &str,
) -> Result<Option<Decimal>, ProviderError> {
    let sel = selector(dividend_css)?;
    document
        .select(&sel)
        .map(text_of)
        .find(|text| text.contains('$'))
        .map(|text| parse_money("annual dividend", &text))
        .transpose()
}

/// Every pair of adjacent `<td>` cells within a row, in document order.
///
/// Label/value tables render as `<td>label</td><td>value</td>`, so each
/// label appears as the first element of a pair with its value.
pub fn extract_key_values(document: &Html) -> Result<Vec<(String, String)>, ProviderError> {
    let tr = selector("tr")?;
    let td = selector("td")?;

    let mut pairs = Vec::new();
    for row in document.select(&tr) {
        let cells: Vec<String> = row.select(&td).map(text_of).collect();
        pairs.extend(
            cells
                .windows(2)
                .map(|pair| (pair[0].clone(), pair[1].clone())),
        );
    }
    Ok(pairs)
}
