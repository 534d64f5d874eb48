use crate::error::ValuationError;
use core_types::BetaSource;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

const BETA_LABEL: &str = "Beta";

/// A beta coefficient together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedBeta {
    pub value: Decimal,
    pub source: BetaSource,
}

/// Picks the beta for a valuation run.
///
/// A non-blank `override_text` wins unconditionally and `entries` are not
/// looked at. Otherwise the first entry labelled exactly `Beta` is used.
pub fn resolve_beta(
    entries: &[(String, String)],
    override_text: Option<&str>,
) -> Result<ResolvedBeta, ValuationError> {
    if let Some(text) = override_text.map(str::trim).filter(|t| !t.is_empty()) {
        let value = parse_beta(text)?;
        return Ok(ResolvedBeta {
            value,
            source: BetaSource::Override,
        });
    }

    let value = extract_beta(entries)?;
    Ok(ResolvedBeta {
        value,
        source: BetaSource::Extracted,
    })
}

/// Linear scan for the first `Beta` label; later duplicates are ignored.
pub fn extract_beta(entries: &[(String, String)]) -> Result<Decimal, ValuationError> {
    let (_, raw) = entries
        .iter()
        .find(|(label, _)| label.trim() == BETA_LABEL)
        .ok_or(ValuationError::BetaNotFound)?;

    parse_beta(raw)
}

/// Betas are small ratios, so a comma is never a thousands separator here.
/// `"1,24"` is rejected rather than read as 124.
fn parse_beta(text: &str) -> Result<Decimal, ValuationError> {
    let text = text.trim();
    if text.is_empty() || text.contains(',') {
        return Err(ValuationError::BetaFormat(text.to_string()));
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| ValuationError::BetaFormat(text.to_string()))
}
