use rust_decimal::Decimal;
use thiserror::Error;

/// Every way a single ticker's valuation can fail.
///
/// None of these are fatal to the host process: the caller reports the error
/// and moves on to the next ticker.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("No forecast table rows were found in the source content")]
    MissingTable,

    #[error("Row '{label}' has {found} cells but the table has {expected} year columns")]
    MalformedRow {
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("Year label '{0}' appears more than once in the table header")]
    DuplicateYear(String),

    #[error("No 'Beta' entry was found in the source content")]
    BetaNotFound,

    #[error("Beta value '{0}' is not a number")]
    BetaFormat(String),

    #[error("Metric '{metric}' is missing{}", year_suffix(.year))]
    MissingMetric {
        metric: String,
        year: Option<String>,
    },

    #[error("Year '{0}' is not present in the forecast table")]
    MissingYear(String),

    #[error("Calculation error: Division by zero encountered in '{0}'")]
    DivisionByZero(String),

    #[error("The company does not pay a dividend; the dividend discount model does not apply")]
    NoDividend,

    #[error("Annual dividend ({0}) must not be negative")]
    NegativeDividend(Decimal),

    #[error("Current price ({0}) must be greater than zero")]
    InvalidPrice(Decimal),

    #[error("Arithmetic overflow while computing '{0}'")]
    Overflow(String),
}

fn year_suffix(year: &Option<String>) -> String {
    year.as_deref()
        .map(|y| format!(" for year {y}"))
        .unwrap_or_default()
}

impl ValuationError {
    /// Beta problems can be answered by rerunning with a manual beta; the
    /// remaining errors mean the upstream data cannot support the model.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ValuationError::BetaNotFound | ValuationError::BetaFormat(_)
        )
    }

    pub(crate) fn missing_metric(metric: &str, year: Option<&str>) -> Self {
        ValuationError::MissingMetric {
            metric: metric.to_string(),
            year: year.map(str::to_string),
        }
    }
}
