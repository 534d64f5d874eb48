use crate::error::ValuationError;
use crate::table::FinancialTable;
use configuration::ProjectionConfig;
use rust_decimal::Decimal;
use serde::Serialize;

pub const EPS: &str = "EPS";
pub const FORWARD_PE: &str = "Forward PE";

/// The two forecast years compared by the projection, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastYears {
    pub first: String,
    pub second: String,
}

impl ForecastYears {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Resolves the configured years, or infers them from the table when the
    /// configuration asks for it.
    ///
    /// Inference picks the first pair of adjacent year columns in which both
    /// EPS and Forward PE are numeric. Scraped tables open with reported years
    /// whose Forward PE is a placeholder, so those are passed over.
    pub fn resolve(
        config: &ProjectionConfig,
        table: &FinancialTable,
    ) -> Result<Self, ValuationError> {
        if !config.infer_years {
            return Ok(Self::new(&config.first_year, &config.second_year));
        }

        table.metric(EPS)?;
        table.metric(FORWARD_PE)?;

        let priced = |year: &str| {
            table.number(EPS, year).is_ok() && table.number(FORWARD_PE, year).is_ok()
        };
        table
            .years()
            .windows(2)
            .find(|pair| priced(&pair[0]) && priced(&pair[1]))
            .map(|pair| Self::new(&pair[0], &pair[1]))
            .ok_or_else(|| {
                ValuationError::MissingYear(format!(
                    "two adjacent years with numeric {EPS} and {FORWARD_PE}"
                ))
            })
    }
}

/// Intermediate values of the earnings projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarningsProjection {
    pub future_eps: Decimal,
    pub average_pe: Decimal,
    pub future_price: Decimal,
}

/// Projects a future share price from two years of EPS and Forward P/E.
///
/// EPS growth between the two years is applied once more to the second
/// year's EPS, and the result is priced at the mean of the two forward P/E
/// ratios. A zero or negative average P/E is passed through as-is.
pub fn project(
    table: &FinancialTable,
    years: &ForecastYears,
) -> Result<EarningsProjection, ValuationError> {
    let eps_first = table.number(EPS, &years.first)?;
    let eps_second = table.number(EPS, &years.second)?;

    if eps_first.is_zero() {
        return Err(ValuationError::DivisionByZero(format!(
            "EPS growth ({EPS} {} is zero)",
            years.first
        )));
    }

    let growth = eps_second
        .checked_sub(eps_first)
        .and_then(|delta| delta.checked_div(eps_first))
        .ok_or_else(|| ValuationError::Overflow("EPS growth".to_string()))?;
    let future_eps = growth
        .checked_add(Decimal::ONE)
        .and_then(|multiplier| eps_second.checked_mul(multiplier))
        .ok_or_else(|| ValuationError::Overflow("future EPS".to_string()))?;

    let pe_first = table.number(FORWARD_PE, &years.first)?;
    let pe_second = table.number(FORWARD_PE, &years.second)?;
    let average_pe = pe_first
        .checked_add(pe_second)
        .map(|sum| sum / Decimal::TWO)
        .ok_or_else(|| ValuationError::Overflow("average PE".to_string()))?;

    let future_price = average_pe
        .checked_mul(future_eps)
        .ok_or_else(|| ValuationError::Overflow("future price".to_string()))?;

    tracing::debug!(
        %eps_first, %eps_second, %future_eps, %average_pe, %future_price,
        "Projected future price"
    );

    Ok(EarningsProjection {
        future_eps,
        average_pe,
        future_price,
    })
}
