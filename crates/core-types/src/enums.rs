use serde::{Deserialize, Serialize};
use std::fmt;

/// The actionable verdict produced by comparing a discounted value with the market price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Buy,
    Sell,
    Hold,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Buy => "Buy",
            Rating::Sell => "Sell",
            Rating::Hold => "Hold",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the beta used in a valuation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetaSource {
    /// Supplied explicitly by the user.
    Override,
    /// Read from the provider's label/value pairs.
    Extracted,
}

impl fmt::Display for BetaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetaSource::Override => f.write_str("manual"),
            BetaSource::Extracted => f.write_str("suggested"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_display_matches_label() {
        assert_eq!(Rating::Sell.to_string(), "Sell");
    }

    #[test]
    fn beta_source_display_matches_report_wording() {
        assert_eq!(BetaSource::Override.to_string(), "manual");
        assert_eq!(BetaSource::Extracted.to_string(), "suggested");
    }
}
