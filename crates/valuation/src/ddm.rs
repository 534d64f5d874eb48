use crate::error::ValuationError;
use configuration::ValuationPolicy;
use core_types::Rating;
use rust_decimal::{Decimal, MathematicalOps};

/// Present value of the projected price plus `horizon_years` of dividends,
/// discounted at `required_return_pct` per year.
///
/// Fails with `NoDividend` before any arithmetic when the company pays no
/// dividend: the model has no meaning for non-payers.
pub fn discounted_value(
    future_price: Decimal,
    required_return_pct: Decimal,
    annual_dividend: Option<Decimal>,
    horizon_years: u32,
) -> Result<Decimal, ValuationError> {
    let dividend = annual_dividend.ok_or(ValuationError::NoDividend)?;
    if dividend < Decimal::ZERO {
        return Err(ValuationError::NegativeDividend(dividend));
    }

    let base = (required_return_pct / Decimal::ONE_HUNDRED)
        .checked_add(Decimal::ONE)
        .ok_or_else(|| ValuationError::Overflow("discount factor".to_string()))?;
    if base.is_zero() {
        return Err(ValuationError::DivisionByZero("discount factor".to_string()));
    }

    let factor = base
        .checked_powu(u64::from(horizon_years))
        .ok_or_else(|| ValuationError::Overflow("discount factor".to_string()))?;
    let dividends = dividend
        .checked_mul(Decimal::from(horizon_years))
        .ok_or_else(|| ValuationError::Overflow("collected dividends".to_string()))?;
    let terminal = future_price
        .checked_add(dividends)
        .ok_or_else(|| ValuationError::Overflow("terminal value".to_string()))?;

    terminal
        .checked_div(factor)
        .ok_or_else(|| ValuationError::DivisionByZero("discount factor".to_string()))
}

/// Classifies a discounted value against the market price. Both band edges
/// are strict, so a value sitting exactly on either edge is a Hold.
pub fn rate(
    discounted: Decimal,
    current_price: Decimal,
    policy: &ValuationPolicy,
) -> Result<Rating, ValuationError> {
    let band_edge = |multiple: Decimal| {
        current_price
            .checked_mul(multiple)
            .ok_or_else(|| ValuationError::Overflow("rating band".to_string()))
    };

    let rating = if discounted > band_edge(policy.buy_multiple)? {
        Rating::Buy
    } else if discounted < band_edge(policy.sell_multiple)? {
        Rating::Sell
    } else {
        Rating::Hold
    };
    Ok(rating)
}

/// Signed distance of the discounted value from the market price, in percent.
pub fn percent_difference(
    discounted: Decimal,
    current_price: Decimal,
) -> Result<Decimal, ValuationError> {
    if current_price.is_zero() {
        return Err(ValuationError::InvalidPrice(current_price));
    }
    discounted
        .checked_sub(current_price)
        .and_then(|gap| gap.checked_div(current_price))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| ValuationError::Overflow("percent difference".to_string()))
}
