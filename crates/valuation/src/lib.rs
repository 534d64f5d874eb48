//! # Valuator Valuation Pipeline
//!
//! This crate turns loosely structured forecast data into a two-year Dividend
//! Discount Model valuation and a Buy / Sell / Hold rating.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of HTTP,
//!   HTML or the terminal. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** `ValuationEngine` takes a `MarketSnapshot` and
//!   produces a `ProjectionResult`. Each ticker's run is independent.
//!
//! ## Pipeline
//!
//! 1. [`table`]: raw rows into a `FinancialTable`.
//! 2. [`beta`]: beta from an override or the provider's label/value pairs.
//! 3. [`capm`]: required rate of return.
//! 4. [`projector`]: forward EPS and projected price.
//! 5. [`ddm`]: discounting, rating and percent difference.

// Declare the modules that constitute this crate.
pub mod beta;
pub mod capm;
pub mod ddm;
pub mod engine;
pub mod error;
pub mod projector;
pub mod report;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use beta::{resolve_beta, ResolvedBeta};
pub use capm::required_return;
pub use engine::ValuationEngine;
pub use error::ValuationError;
pub use projector::{EarningsProjection, ForecastYears};
pub use report::ProjectionResult;
pub use table::FinancialTable;

use configuration::{CapmConstants, ProjectionConfig, ValuationPolicy};
use core_types::MarketSnapshot;

/// Values one snapshot with explicit years and CAPM constants under the
/// default rating policy.
pub fn analyze(
    snapshot: &MarketSnapshot,
    years: &ForecastYears,
    beta_override: Option<&str>,
    constants: &CapmConstants,
) -> Result<ProjectionResult, ValuationError> {
    ValuationEngine::new(
        constants.clone(),
        ProjectionConfig::default(),
        ValuationPolicy::default(),
    )
    .with_forecast_years(years.clone())
    .analyze(snapshot, beta_override)
}
