use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::MortgageCalcError;
use crate::types::{Money, Percent, Rate};
use crate::MortgageCalcResult;

/// Monthly periodic rate for an annual percentage (5 -> 0.05 / 12).
pub fn monthly_rate(annual_pct: Percent) -> Rate {
    periodic_rate(annual_pct, 12)
}

/// Periodic rate for an annual percentage split evenly over `periods_per_year`.
pub fn periodic_rate(annual_pct: Percent, periods_per_year: u32) -> Rate {
    annual_pct / dec!(100) / Decimal::from(periods_per_year)
}

/// Discount factor (1 + r)^-n.
///
/// When (1 + r)^n no longer fits a Decimal the factor is below 1e-28 and
/// rounds to zero, which turns the annuity into a perpetuity.
fn discount_factor(rate: Rate, nper: u32) -> Decimal {
    match (Decimal::ONE + rate).checked_powu(u64::from(nper)) {
        Some(factor) => Decimal::ONE / factor,
        None => {
            tracing::debug!(%rate, nper, "compounding overflow, using perpetuity limit");
            Decimal::ZERO
        }
    }
}

/// Level payment that retires `principal` over `nper` periods (annuity formula).
///
/// A zero rate degenerates to straight-line repayment.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> MortgageCalcResult<Money> {
    if nper == 0 {
        return Err(MortgageCalcError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if rate < Decimal::ZERO {
        return Err(MortgageCalcError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate cannot be negative".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let denominator = Decimal::ONE - discount_factor(rate, nper);
    if denominator.is_zero() {
        return Err(MortgageCalcError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    Ok(principal * rate / denominator)
}

/// Principal serviceable by a level `payment` over `nper` periods.
///
/// Inverse of [`annuity_payment`].
pub fn annuity_principal(payment: Money, rate: Rate, nper: u32) -> MortgageCalcResult<Money> {
    if nper == 0 {
        return Err(MortgageCalcError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if rate < Decimal::ZERO {
        return Err(MortgageCalcError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate cannot be negative".into(),
        });
    }

    if rate.is_zero() {
        return Ok(payment * Decimal::from(nper));
    }

    Ok(payment * (Decimal::ONE - discount_factor(rate, nper)) / rate)
}
