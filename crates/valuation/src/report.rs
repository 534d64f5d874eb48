use crate::beta::ResolvedBeta;
use crate::projector::ForecastYears;
use chrono::{DateTime, Utc};
use core_types::Rating;
use rust_decimal::Decimal;
use serde::Serialize;

/// The outcome of one ticker's valuation run.
///
/// This struct is the final output of the `ValuationEngine` and what the
/// reporting layer renders. It is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub ticker: String,
    pub as_of: DateTime<Utc>,
    pub current_price: Decimal,
    pub annual_dividend: Decimal,

    // I. Inputs resolved along the way
    pub beta: ResolvedBeta,
    pub years: ForecastYears,
    /// Required rate of return, in percent.
    pub required_return: Decimal,

    // II. Earnings projection
    pub future_eps: Decimal,
    pub average_pe: Decimal,
    /// Projected price before discounting.
    pub future_price: Decimal,

    // III. Dividend discount model
    /// Present value of the projected price plus dividends; shown to users
    /// as the "final future price".
    pub discounted_value: Decimal,
    /// `(discounted_value - current_price) / current_price * 100`.
    pub percent_difference: Decimal,
    pub rating: Rating,
}
