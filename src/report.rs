use comfy_table::{Cell, Color, Table, presets::UTF8_FULL};
use core_types::Rating;
use rust_decimal::Decimal;
use valuation::{ProjectionResult, ValuationError};

/// One ticker's outcome, in the order the tickers were requested.
pub struct Outcome {
    pub ticker: String,
    pub result: anyhow::Result<ProjectionResult>,
}

fn money(value: Decimal) -> String {
    format!("${:.2}", value)
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

fn rating_cell(rating: Rating) -> Cell {
    let color = match rating {
        Rating::Buy => Color::Green,
        Rating::Sell => Color::Red,
        Rating::Hold => Color::Yellow,
    };
    Cell::new(rating).fg(color)
}

/// Field-by-field breakdown of a single valuation.
pub fn detail_table(result: &ProjectionResult, horizon_years: u32) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new(&result.ticker),
        Cell::new(""),
    ]);

    table
        .add_row(vec![
            "Current Price".to_string(),
            format!(
                "{} as of {}",
                money(result.current_price),
                result.as_of.date_naive()
            ),
        ])
        .add_row(vec![
            "Beta Used".to_string(),
            format!("{} ({})", result.beta.value, result.beta.source),
        ])
        .add_row(vec![
            "Required Return".to_string(),
            percent(result.required_return),
        ])
        .add_row(vec![
            "Annual Dividend".to_string(),
            money(result.annual_dividend),
        ])
        .add_row(vec![
            format!("Forward EPS ({} growth)", result.years.second),
            format!("{:.2}", result.future_eps),
        ])
        .add_row(vec![
            format!("Average PE ({}/{})", result.years.first, result.years.second),
            format!("{:.2}", result.average_pe),
        ])
        .add_row(vec![
            "Projected Price".to_string(),
            money(result.future_price),
        ])
        .add_row(vec![
            format!("Future Price (DDM-{horizon_years}ys)"),
            money(result.discounted_value),
        ]);
    table.add_row(vec![Cell::new("Rating"), rating_cell(result.rating)]);
    table.add_row(vec![
        "Percent Difference".to_string(),
        percent(result.percent_difference),
    ]);
    table
}

/// One line per successful ticker, for multi-ticker runs.
pub fn summary_table(outcomes: &[Outcome], horizon_years: u32) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Ticker".to_string(),
        "Current Price".to_string(),
        "Beta".to_string(),
        format!("Future Price (DDM-{horizon_years}ys)"),
        "Rating".to_string(),
        "Percent Difference".to_string(),
    ]);

    for outcome in outcomes {
        if let Ok(result) = &outcome.result {
            table.add_row(vec![
                Cell::new(&result.ticker),
                Cell::new(money(result.current_price)),
                Cell::new(result.beta.value),
                Cell::new(money(result.discounted_value)),
                rating_cell(result.rating),
                Cell::new(percent(result.percent_difference)),
            ]);
        }
    }
    table
}

/// A message for a failed ticker, with a hint when a manual beta would help.
pub fn failure_message(ticker: &str, error: &anyhow::Error) -> String {
    let hint = match error.downcast_ref::<ValuationError>() {
        Some(e) if e.is_recoverable() => "\n  Hint: rerun with --beta <VALUE> to supply a beta manually.",
        Some(ValuationError::NoDividend) => {
            "\n  The dividend discount model only works on companies paying a dividend."
        }
        _ => "",
    };
    format!("{ticker}: {error:#}{hint}")
}

/// Machine-readable form of every outcome.
pub fn to_json(outcomes: &[Outcome]) -> serde_json::Value {
    let entries = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(result) => serde_json::json!({
                "ticker": outcome.ticker,
                "result": result,
            }),
            Err(error) => serde_json::json!({
                "ticker": outcome.ticker,
                "error": format!("{error:#}"),
            }),
        })
        .collect();
    serde_json::Value::Array(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::BetaSource;
    use rust_decimal_macros::dec;
    use valuation::{ForecastYears, ResolvedBeta};

    fn result() -> ProjectionResult {
        ProjectionResult {
            ticker: "KO".to_string(),
            as_of: Utc.with_ymd_and_hms(2024, 11, 1, 16, 0, 0).unwrap(),
            current_price: dec!(100),
            annual_dividend: dec!(2),
            beta: ResolvedBeta {
                value: dec!(1.0),
                source: BetaSource::Extracted,
            },
            years: ForecastYears::new("2024", "2025"),
            required_return: dec!(9.0),
            future_eps: dec!(7.2),
            average_pe: dec!(19),
            future_price: dec!(136.8),
            discounted_value: dec!(118.5085),
            percent_difference: dec!(18.5085),
            rating: Rating::Buy,
        }
    }

    #[test]
    fn detail_table_shows_user_facing_fields() {
        let rendered = detail_table(&result(), 2).to_string();
        assert!(rendered.contains("$100.00 as of 2024-11-01"));
        assert!(rendered.contains("Future Price (DDM-2ys)"));
        assert!(rendered.contains("$118.51"));
        assert!(rendered.contains("18.51%"));
        assert!(rendered.contains("Buy"));
    }

    #[test]
    fn summary_skips_failures() {
        let outcomes = vec![
            Outcome {
                ticker: "KO".to_string(),
                result: Ok(result()),
            },
            Outcome {
                ticker: "TSLA".to_string(),
                result: Err(ValuationError::NoDividend.into()),
            },
        ];
        let rendered = summary_table(&outcomes, 2).to_string();
        assert!(rendered.contains("KO"));
        assert!(!rendered.contains("TSLA"));
    }

    #[test]
    fn beta_failures_suggest_manual_override() {
        let error: anyhow::Error = ValuationError::BetaNotFound.into();
        assert!(failure_message("XYZ", &error).contains("--beta"));

        let error: anyhow::Error = ValuationError::NoDividend.into();
        assert!(failure_message("TSLA", &error).contains("paying a dividend"));
    }

    #[test]
    fn json_keeps_request_order_and_errors() {
        let outcomes = vec![
            Outcome {
                ticker: "TSLA".to_string(),
                result: Err(ValuationError::NoDividend.into()),
            },
            Outcome {
                ticker: "KO".to_string(),
                result: Ok(result()),
            },
        ];
        let json = to_json(&outcomes);
        assert_eq!(json[0]["ticker"], "TSLA");
        assert!(json[0]["error"].as_str().unwrap().contains("dividend"));
        assert_eq!(json[1]["result"]["rating"], "Buy");
    }
}
