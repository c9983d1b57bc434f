//! Mortgage default insurance premiums.
//!
//! Loans with less than 20% down require insurance. The premium is a step
//! function of loan-to-value and is capitalized into the mortgage rather
//! than paid at closing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageCalcError;
use crate::types::{Money, Percent, Rate};
use crate::MortgageCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Down payment share at or above which a mortgage is conventional (uninsured).
pub const MIN_DOWN_PAYMENT_RATIO: Rate = dec!(0.20);

/// Highest loan-to-value that can be insured.
pub const MAX_INSURABLE_LTV_PCT: Percent = dec!(95);

/// `(max_ltv_pct, premium_rate)` brackets, sorted ascending, inclusive upper bounds.
pub const PREMIUM_SCHEDULE: [(Percent, Rate); 6] = [
    (dec!(65), dec!(0.0060)),
    (dec!(75), dec!(0.0170)),
    (dec!(80), dec!(0.0240)),
    (dec!(85), dec!(0.0280)),
    (dec!(90), dec!(0.0310)),
    (dec!(95), dec!(0.0400)),
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Insurance premium charged on a high-ratio mortgage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePremium {
    /// Loan amount over purchase price, in percent (e.g. 95 = 95%).
    pub loan_to_value_pct: Percent,
    /// Premium as a fraction of the loan (e.g. 0.04 = 4%).
    pub premium_rate: Rate,
    /// Premium amount, added to the mortgage principal.
    pub premium_amount: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Look up the premium rate for a loan-to-value ratio.
pub fn premium_rate(loan_to_value_pct: Percent) -> MortgageCalcResult<Rate> {
    if loan_to_value_pct < Decimal::ZERO {
        return Err(MortgageCalcError::invalid(
            "loan_to_value_pct",
            "Loan-to-value cannot be negative",
        ));
    }

    PREMIUM_SCHEDULE
        .iter()
        .find(|(max_ltv, _)| loan_to_value_pct <= *max_ltv)
        .map(|(_, rate)| *rate)
        .ok_or(MortgageCalcError::NotInsurable { loan_to_value_pct })
}

/// Premium owed on a purchase, or `None` when insurance is not required.
///
/// Callers validate `down_payment <= home_price` beforehand; a larger down
/// payment is treated as a zero-principal loan.
pub fn assess_insurance(
    home_price: Money,
    down_payment: Money,
) -> MortgageCalcResult<Option<InsurancePremium>> {
    if home_price <= Decimal::ZERO {
        return Ok(None);
    }
    if down_payment / home_price >= MIN_DOWN_PAYMENT_RATIO {
        return Ok(None);
    }

    let principal = (home_price - down_payment).max(Decimal::ZERO);
    let loan_to_value_pct = principal / home_price * dec!(100);
    let rate = premium_rate(loan_to_value_pct)?;
    let premium_amount = principal * rate;

    tracing::debug!(%loan_to_value_pct, %rate, %premium_amount, "mortgage insurance required");

    Ok(Some(InsurancePremium {
        loan_to_value_pct,
        premium_rate: rate,
        premium_amount,
    }))
}

/// Smallest down payment that keeps a purchase insurable.
pub fn minimum_down_payment(home_price: Money) -> Money {
    let max_ltv = MAX_INSURABLE_LTV_PCT / dec!(100);
    (home_price * (Decimal::ONE - max_ltv)).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_premium_rate_brackets_inclusive() {
        assert_eq!(premium_rate(dec!(0)).unwrap(), dec!(0.0060));
        assert_eq!(premium_rate(dec!(65)).unwrap(), dec!(0.0060));
        assert_eq!(premium_rate(dec!(65.01)).unwrap(), dec!(0.0170));
        assert_eq!(premium_rate(dec!(75)).unwrap(), dec!(0.0170));
        assert_eq!(premium_rate(dec!(80)).unwrap(), dec!(0.0240));
        assert_eq!(premium_rate(dec!(85)).unwrap(), dec!(0.0280));
        assert_eq!(premium_rate(dec!(90)).unwrap(), dec!(0.0310));
        assert_eq!(premium_rate(dec!(95)).unwrap(), dec!(0.0400));
    }

    #[test]
    fn test_premium_rate_above_95_not_insurable() {
        let err = premium_rate(dec!(95.5)).unwrap_err();
        match err {
            MortgageCalcError::NotInsurable { loan_to_value_pct } => {
                assert_eq!(loan_to_value_pct, dec!(95.5));
            }
            other => panic!("Expected NotInsurable, got {other:?}"),
        }
    }

    #[test]
    fn test_premium_rate_negative_rejected() {
        assert!(matches!(
            premium_rate(dec!(-1)),
            Err(MortgageCalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_assess_insurance_twenty_percent_down_uninsured() {
        assert_eq!(assess_insurance(dec!(500000), dec!(100000)).unwrap(), None);
    }

    #[test]
    fn test_assess_insurance_zero_price() {
        assert_eq!(assess_insurance(Decimal::ZERO, Decimal::ZERO).unwrap(), None);
    }

    #[test]
    fn test_assess_insurance_ten_percent_down() {
        let premium = assess_insurance(dec!(400000), dec!(40000)).unwrap().unwrap();
        assert_eq!(premium.loan_to_value_pct, dec!(90));
        assert_eq!(premium.premium_rate, dec!(0.0310));
        assert_eq!(premium.premium_amount, dec!(11160));
    }

    #[test]
    fn test_assess_insurance_under_five_percent_down() {
        let err = assess_insurance(dec!(500000), dec!(20000)).unwrap_err();
        assert!(matches!(err, MortgageCalcError::NotInsurable { .. }));
    }

    #[test]
    fn test_minimum_down_payment() {
        assert_eq!(minimum_down_payment(dec!(500000)), dec!(25000));
    }
}
