use crate::error::ValuationError;
use configuration::CapmConstants;
use rust_decimal::Decimal;

/// Required rate of return, in percent, under the Capital Asset Pricing Model:
/// `treasury_yield + beta * risk_premium`.
///
/// `constants.market_return` is not read by this formula. Any beta is
/// accepted; one too large to price fails with `Overflow`.
pub fn required_return(
    beta: Decimal,
    constants: &CapmConstants,
) -> Result<Decimal, ValuationError> {
    beta
        .checked_mul(constants.risk_premium)
        .and_then(|premium| constants.treasury_yield.checked_add(premium))
        .ok_or_else(|| ValuationError::Overflow("required return".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn constants() -> CapmConstants {
        CapmConstants {
            treasury_yield: dec!(4.0),
            market_return: dec!(9.67),
            risk_premium: dec!(5.0),
        }
    }

    #[test]
    fn unit_beta_adds_full_premium() {
        assert_eq!(required_return(dec!(1.0), &constants()).unwrap(), dec!(9.0));
    }

    #[test]
    fn linear_in_beta() {
        let c = constants();
        let at_half = required_return(dec!(0.5), &c).unwrap();
        let at_one_and_half = required_return(dec!(1.5), &c).unwrap();
        assert_eq!(at_half, dec!(6.5));
        assert_eq!(at_one_and_half, dec!(11.5));
        // Slope equals the premium, intercept equals the treasury yield.
        assert_eq!((at_one_and_half - at_half) / dec!(1.0), c.risk_premium);
        assert_eq!(required_return(Decimal::ZERO, &c).unwrap(), c.treasury_yield);
    }

    #[test]
    fn negative_beta_lowers_the_rate() {
        assert_eq!(required_return(dec!(-0.2), &constants()).unwrap(), dec!(3.0));
    }

    #[test]
    fn market_return_does_not_move_the_result() {
        let mut c = constants();
        let before = required_return(dec!(1.3), &c).unwrap();
        c.market_return = dec!(25);
        assert_eq!(required_return(dec!(1.3), &c).unwrap(), before);
    }

    #[test]
    fn reference_constants() {
        let c = CapmConstants::default();
        assert_eq!(required_return(dec!(1.0), &c).unwrap(), dec!(9.07));
    }

    #[test]
    fn oversized_beta_is_an_overflow_error() {
        let beta = Decimal::from_scientific("2e28").unwrap();
        assert_eq!(
            required_return(beta, &constants()),
            Err(ValuationError::Overflow("required return".to_string()))
        );
    }
}
