use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an absent `config.toml` yields the
/// reference deployment's settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capm: CapmConstants,
    pub projection: ProjectionConfig,
    pub policy: ValuationPolicy,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
    pub tickers: TickersConfig,
}

/// Market constants for the Capital Asset Pricing Model.
///
/// All values are plain percentages: 4.45 means 4.45%.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CapmConstants {
    /// The risk-free rate, taken from the treasury yield.
    pub treasury_yield: Decimal,
    /// Expected market return. Carried for interface stability; the current
    /// required-return formula does not read it.
    pub market_return: Decimal,
    pub risk_premium: Decimal,
}

/// Which two forecast years feed the earnings projection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub first_year: String,
    pub second_year: String,
    /// When set, the first adjacent pair of year columns with numeric EPS and
    /// Forward PE is used instead of `first_year` and `second_year`.
    pub infer_years: bool,
}

/// Policy constants of the dividend discount model and the rating rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValuationPolicy {
    /// A discounted value above `price * buy_multiple` rates as Buy.
    pub buy_multiple: Decimal,
    /// A discounted value below `price * sell_multiple` rates as Sell.
    pub sell_multiple: Decimal,
    /// Number of years of dividends collected before the projected price is realised.
    pub horizon_years: u32,
}

/// Settings for the HTTP data provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// CSS selector for the forecast tables on the forecast page.
    pub table_selector: String,
    /// CSS selector for the element holding the current price.
    pub price_selector: String,
    /// CSS selector for the candidate elements holding the annual dividend.
    pub dividend_selector: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Directory for daily rolling log files. Console only when absent.
    pub directory: Option<PathBuf>,
}

/// Location of the reference list of dividend-paying tickers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TickersConfig {
    pub path: PathBuf,
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

// --- Default Implementations ---
// These mirror the reference deployment so the config file stays optional.

impl Default for CapmConstants {
    fn default() -> Self {
        Self {
            treasury_yield: dec!(4.45),
            market_return: dec!(9.67),
            risk_premium: dec!(4.62),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            first_year: "2024".to_string(),
            second_year: "2025".to_string(),
            infer_years: false,
        }
    }
}

impl Default for ValuationPolicy {
    fn default() -> Self {
        Self {
            buy_multiple: dec!(1.02),
            sell_multiple: dec!(0.95),
            horizon_years: 2,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://stockanalysis.com".to_string(),
            timeout_secs: 30,
            user_agent: concat!("valuator/", env!("CARGO_PKG_VERSION")).to_string(),
            table_selector: "table.w-full.whitespace-nowrap.border.text-right".to_string(),
            price_selector: r"div.text-4xl.font-bold.block".to_string(),
            dividend_selector: r"div.mt-0\.5.text-lg.font-semibold".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Default for TickersConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tickers.txt"),
        }
    }
}

impl Config {
    /// Rejects settings that would make the model or the provider meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let policy = &self.policy;
        if policy.buy_multiple <= Decimal::ZERO || policy.sell_multiple <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "policy multiples must be greater than 0".to_string(),
            ));
        }
        if policy.sell_multiple > policy.buy_multiple {
            return Err(ConfigError::ValidationError(format!(
                "sell_multiple ({}) must not exceed buy_multiple ({})",
                policy.sell_multiple, policy.buy_multiple
            )));
        }
        if policy.horizon_years == 0 {
            return Err(ConfigError::ValidationError(
                "horizon_years must be at least 1".to_string(),
            ));
        }

        let projection = &self.projection;
        if !projection.infer_years {
            if projection.first_year.trim().is_empty() || projection.second_year.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "projection years must not be empty".to_string(),
                ));
            }
            if projection.first_year == projection.second_year {
                return Err(ConfigError::ValidationError(format!(
                    "projection years must differ (both are '{}')",
                    projection.first_year
                )));
            }
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
