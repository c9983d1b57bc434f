//! Fixed-rate mortgage payment calculator.
//!
//! Computes the periodic payment on a purchase after capitalizing any
//! required default-insurance premium into the loan. Payments are derived
//! on a monthly basis and then divided for accelerated frequencies.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageCalcError;
use crate::insurance::{self, InsurancePremium};
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageCalcResult;

/// Amortization beyond this length normally attracts an insurance surcharge.
const STANDARD_MAX_AMORTIZATION_YEARS: u32 = 25;

/// Longest amortization accepted.
pub const MAX_AMORTIZATION_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How often the borrower pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    /// 26 payments a year at half the monthly amount.
    Biweekly,
    /// 52 payments a year at a quarter of the monthly amount.
    Weekly,
}

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Biweekly => 26,
            PaymentFrequency::Weekly => 52,
        }
    }

    /// Divisor applied to the monthly payment.
    pub fn divisor(self) -> Decimal {
        match self {
            PaymentFrequency::Monthly => Decimal::ONE,
            PaymentFrequency::Biweekly => dec!(2),
            PaymentFrequency::Weekly => dec!(4),
        }
    }
}

/// Input for a mortgage payment calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Purchase price in dollars.
    pub home_price: Money,
    /// Cash down payment in dollars.
    pub down_payment: Money,
    /// Annual interest rate in percent (e.g. 5 = 5%).
    pub annual_interest_rate_pct: Percent,
    /// Amortization period in years.
    pub amortization_years: u32,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
}

/// Output of a mortgage payment calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Loan amount plus capitalized insurance premium.
    pub mortgage_principal: Money,
    /// Payment at the requested frequency.
    pub periodic_payment: Money,
    /// Monthly payment the periodic payment is derived from.
    pub monthly_payment: Money,
    pub total_interest: Money,
    /// Purchase price plus total interest.
    pub total_cost: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<InsurancePremium>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the payment for a purchase. Pure and deterministic.
pub fn compute_payment(req: &PaymentRequest) -> MortgageCalcResult<PaymentResult> {
    validate(req)?;

    let mut principal = (req.home_price - req.down_payment).max(Decimal::ZERO);

    let insurance = insurance::assess_insurance(req.home_price, req.down_payment)?;
    if let Some(premium) = &insurance {
        principal += premium.premium_amount;
    }

    let months = req.amortization_years * 12;
    let rate = time_value::monthly_rate(req.annual_interest_rate_pct);
    let monthly_payment = time_value::annuity_payment(principal, rate, months)?;
    let periodic_payment = monthly_payment / req.payment_frequency.divisor();

    let total_interest = monthly_payment * Decimal::from(months) - principal;
    let total_cost = req.home_price + total_interest;

    Ok(PaymentResult {
        mortgage_principal: principal,
        periodic_payment,
        monthly_payment,
        total_interest,
        total_cost,
        insurance,
    })
}

/// Compute the payment and wrap it in the standard output envelope.
pub fn analyze_payment(
    req: &PaymentRequest,
) -> MortgageCalcResult<ComputationOutput<PaymentResult>> {
    let start = Instant::now();
    let result = compute_payment(req)?;

    let mut warnings = Vec::new();
    if let Some(premium) = &result.insurance {
        warnings.push(format!(
            "Down payment below 20%: insurance premium of {} ({}% of loan) capitalized into the mortgage",
            premium.premium_amount.round_dp(2),
            (premium.premium_rate * dec!(100)).normalize()
        ));
    }
    if req.amortization_years > STANDARD_MAX_AMORTIZATION_YEARS {
        warnings.push(format!(
            "Amortization of {} years exceeds {} years; lenders may apply a premium surcharge",
            req.amortization_years, STANDARD_MAX_AMORTIZATION_YEARS
        ));
    }
    if req.payment_frequency != PaymentFrequency::Monthly {
        warnings.push(format!(
            "{:?} payment approximated as monthly payment / {}",
            req.payment_frequency,
            req.payment_frequency.divisor()
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate annuity, monthly compounding, capitalized insurance premium",
        req,
        warnings,
        elapsed,
        result,
    ))
}

fn validate(req: &PaymentRequest) -> MortgageCalcResult<()> {
    if req.home_price < Decimal::ZERO {
        return Err(MortgageCalcError::invalid(
            "home_price",
            "Home price cannot be negative",
        ));
    }
    if req.down_payment < Decimal::ZERO {
        return Err(MortgageCalcError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }
    if req.down_payment > req.home_price {
        return Err(MortgageCalcError::invalid(
            "down_payment",
            "Down payment cannot exceed home price",
        ));
    }
    if req.annual_interest_rate_pct < Decimal::ZERO {
        return Err(MortgageCalcError::invalid(
            "annual_interest_rate_pct",
            "Interest rate cannot be negative",
        ));
    }
    if req.amortization_years == 0 {
        return Err(MortgageCalcError::invalid(
            "amortization_years",
            "Amortization must be at least one year",
        ));
    }
    if req.amortization_years > MAX_AMORTIZATION_YEARS {
        return Err(MortgageCalcError::invalid(
            "amortization_years",
            format!("Amortization cannot exceed {MAX_AMORTIZATION_YEARS} years"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn request(price: Decimal, down: Decimal, rate: Decimal) -> PaymentRequest {
        PaymentRequest {
            home_price: price,
            down_payment: down,
            annual_interest_rate_pct: rate,
            amortization_years: 25,
            payment_frequency: PaymentFrequency::Monthly,
        }
    }

    #[test]
    fn test_conventional_mortgage_no_insurance() {
        let result = compute_payment(&request(dec!(500000), dec!(100000), dec!(5))).unwrap();
        assert!(result.insurance.is_none());
        assert_eq!(result.mortgage_principal, dec!(400000));
        assert_close(result.periodic_payment, dec!(2338.36), TOL, "monthly payment");
    }

    #[test]
    fn test_high_ratio_premium_capitalized() {
        let result = compute_payment(&request(dec!(500000), dec!(25000), dec!(5))).unwrap();
        let premium = result.insurance.clone().unwrap();
        assert_eq!(premium.loan_to_value_pct, dec!(95));
        assert_eq!(premium.premium_rate, dec!(0.04));
        assert_eq!(premium.premium_amount, dec!(19000));
        assert_eq!(result.mortgage_principal, dec!(494000));
    }

    #[test]
    fn test_zero_price_zero_payment() {
        let result = compute_payment(&request(Decimal::ZERO, Decimal::ZERO, dec!(5))).unwrap();
        assert!(result.insurance.is_none());
        assert_eq!(result.periodic_payment, Decimal::ZERO);
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let result = compute_payment(&request(dec!(400000), dec!(100000), Decimal::ZERO)).unwrap();
        assert_eq!(result.periodic_payment, dec!(1000));
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert_eq!(result.total_cost, dec!(400000));
    }

    #[test]
    fn test_frequency_divisors() {
        let mut req = request(dec!(600000), dec!(150000), dec!(4.5));
        let monthly = compute_payment(&req).unwrap().periodic_payment;
        req.payment_frequency = PaymentFrequency::Biweekly;
        assert_eq!(compute_payment(&req).unwrap().periodic_payment, monthly / dec!(2));
        req.payment_frequency = PaymentFrequency::Weekly;
        assert_eq!(compute_payment(&req).unwrap().periodic_payment, monthly / dec!(4));
    }

    #[test]
    fn test_down_payment_exceeds_price_rejected() {
        let err = compute_payment(&request(dec!(100000), dec!(100001), dec!(5))).unwrap_err();
        match err {
            MortgageCalcError::InvalidInput { field, .. } => assert_eq!(field, "down_payment"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = compute_payment(&request(dec!(100000), dec!(20000), dec!(-1))).unwrap_err();
        assert!(matches!(err, MortgageCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_zero_amortization_rejected() {
        let mut req = request(dec!(100000), dec!(20000), dec!(5));
        req.amortization_years = 0;
        assert!(matches!(
            compute_payment(&req),
            Err(MortgageCalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_amortization_above_maximum_rejected() {
        let mut req = request(dec!(100000), dec!(20000), Decimal::ZERO);
        req.amortization_years = MAX_AMORTIZATION_YEARS;
        assert!(compute_payment(&req).is_ok());

        for years in [MAX_AMORTIZATION_YEARS + 1, 10_000_000, 400_000_000, u32::MAX] {
            req.amortization_years = years;
            match compute_payment(&req).unwrap_err() {
                MortgageCalcError::InvalidInput { field, .. } => {
                    assert_eq!(field, "amortization_years")
                }
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_ninety_seven_percent_ltv_not_insurable() {
        let err = compute_payment(&request(dec!(500000), dec!(15000), dec!(5))).unwrap_err();
        assert!(matches!(err, MortgageCalcError::NotInsurable { .. }));
    }

    #[test]
    fn test_analyze_payment_warnings() {
        let mut req = request(dec!(500000), dec!(50000), dec!(5));
        req.amortization_years = 30;
        req.payment_frequency = PaymentFrequency::Weekly;
        let output = analyze_payment(&req).unwrap();
        assert_eq!(output.warnings.len(), 3);
        assert!(output.warnings[0].contains("insurance premium"));
    }

    #[test]
    fn test_frequency_serde_snake_case() {
        let freq: PaymentFrequency = serde_json::from_str("\"biweekly\"").unwrap();
        assert_eq!(freq, PaymentFrequency::Biweekly);
    }
}
