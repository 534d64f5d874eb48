use crate::beta::resolve_beta;
use crate::capm::required_return;
use crate::ddm::{discounted_value, percent_difference, rate};
use crate::error::ValuationError;
use crate::projector::{project, ForecastYears};
use crate::report::ProjectionResult;
use crate::table::FinancialTable;
use configuration::{CapmConstants, Config, ProjectionConfig, ValuationPolicy};
use core_types::MarketSnapshot;
use rust_decimal::Decimal;

/// A stateless calculator that turns a provider snapshot into a valuation.
///
/// The engine only holds configuration, so a single instance can be shared
/// across any number of concurrent ticker runs.
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    capm: CapmConstants,
    projection: ProjectionConfig,
    policy: ValuationPolicy,
}

impl ValuationEngine {
    pub fn new(capm: CapmConstants, projection: ProjectionConfig, policy: ValuationPolicy) -> Self {
        Self {
            capm,
            projection,
            policy,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.capm.clone(),
            config.projection.clone(),
            config.policy.clone(),
        )
    }

    /// Pins the projection to an explicit pair of forecast years.
    pub fn with_forecast_years(mut self, years: ForecastYears) -> Self {
        self.projection.first_year = years.first;
        self.projection.second_year = years.second;
        self.projection.infer_years = false;
        self
    }

    pub fn policy(&self) -> &ValuationPolicy {
        &self.policy
    }

    /// The main entry point for valuing one ticker.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Raw table, beta pairs, price and dividend from the data provider.
    /// * `beta_override` - A manually supplied beta; blank means "use the extracted one".
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ProjectionResult` or the first `ValuationError`
    /// met along the pipeline.
    pub fn analyze(
        &self,
        snapshot: &MarketSnapshot,
        beta_override: Option<&str>,
    ) -> Result<ProjectionResult, ValuationError> {
        // --- 1. Preconditions ---
        // Non-payers are rejected before any parsing or arithmetic.
        let annual_dividend = match snapshot.annual_dividend {
            None => return Err(ValuationError::NoDividend),
            Some(d) if d < Decimal::ZERO => return Err(ValuationError::NegativeDividend(d)),
            Some(d) => d,
        };
        if snapshot.current_price <= Decimal::ZERO {
            return Err(ValuationError::InvalidPrice(snapshot.current_price));
        }

        // --- 2. Typed inputs ---
        let table = FinancialTable::parse(&snapshot.table)?;
        let years = ForecastYears::resolve(&self.projection, &table)?;
        let beta = resolve_beta(&snapshot.key_values, beta_override)?;

        // --- 3. Projection and discounting ---
        let required_return = required_return(beta.value, &self.capm)?;
        let projection = project(&table, &years)?;
        let discounted = discounted_value(
            projection.future_price,
            required_return,
            Some(annual_dividend),
            self.policy.horizon_years,
        )?;

        // --- 4. Verdict ---
        let rating = rate(discounted, snapshot.current_price, &self.policy)?;
        let percent_difference = percent_difference(discounted, snapshot.current_price)?;

        tracing::info!(
            ticker = %snapshot.ticker,
            beta = %beta.value,
            %required_return,
            %discounted,
            %rating,
            "Valuation complete"
        );

        Ok(ProjectionResult {
            ticker: snapshot.ticker.clone(),
            as_of: snapshot.retrieved_at,
            current_price: snapshot.current_price,
            annual_dividend,
            beta,
            years,
            required_return,
            future_eps: projection.future_eps,
            average_pe: projection.average_pe,
            future_price: projection.future_price,
            discounted_value: discounted,
            percent_difference,
            rating,
        })
    }
}
