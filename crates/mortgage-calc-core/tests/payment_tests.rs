use mortgage_calc_core::insurance;
use mortgage_calc_core::payment::{self, PaymentFrequency, PaymentRequest};
use mortgage_calc_core::MortgageCalcError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

fn purchase(price: Decimal, down: Decimal, rate: Decimal) -> PaymentRequest {
    PaymentRequest {
        home_price: price,
        down_payment: down,
        annual_interest_rate_pct: rate,
        amortization_years: 25,
        payment_frequency: PaymentFrequency::Monthly,
    }
}

// ===========================================================================
// Insurance
// ===========================================================================

#[test]
fn test_no_insurance_at_or_above_twenty_percent_down() {
    for down in [dec!(100000), dec!(150000), dec!(250000), dec!(500000)] {
        let result = payment::compute_payment(&purchase(dec!(500000), down, dec!(5))).unwrap();
        assert!(result.insurance.is_none(), "down payment {down} should be uninsured");
        assert_eq!(result.mortgage_principal, dec!(500000) - down);
    }
}

#[test]
fn test_premium_capitalized_below_twenty_percent_down() {
    for down in [dec!(25000), dec!(40000), dec!(60000), dec!(99999)] {
        let result = payment::compute_payment(&purchase(dec!(500000), down, dec!(5))).unwrap();
        let premium = result.insurance.as_ref().expect("insurance required");
        assert!(premium.premium_amount > Decimal::ZERO);
        assert!(result.mortgage_principal > dec!(500000) - down);
        assert_eq!(
            result.mortgage_principal,
            dec!(500000) - down + premium.premium_amount
        );
    }
}

#[test]
fn test_five_percent_down_scenario() {
    // LTV 475k / 500k = 95% -> 4.00% premium
    let result = payment::compute_payment(&purchase(dec!(500000), dec!(25000), dec!(5))).unwrap();
    let premium = result.insurance.unwrap();
    assert_eq!(premium.loan_to_value_pct, dec!(95));
    assert_eq!(premium.premium_rate, dec!(0.04));
    assert_eq!(premium.premium_amount, dec!(19000));
    assert_eq!(result.mortgage_principal, dec!(494000));
}

#[test]
fn test_not_insurable_above_ninety_five_percent() {
    let err = payment::compute_payment(&purchase(dec!(500000), dec!(10000), dec!(5))).unwrap_err();
    match err {
        MortgageCalcError::NotInsurable { loan_to_value_pct } => {
            assert_eq!(loan_to_value_pct, dec!(98));
        }
        other => panic!("Expected NotInsurable, got {other:?}"),
    }
}

#[test]
fn test_minimum_down_payment_is_insurable() {
    let price = dec!(735000);
    let down = insurance::minimum_down_payment(price);
    assert!(payment::compute_payment(&purchase(price, down, dec!(5))).is_ok());
}

// ===========================================================================
// Payment formula
// ===========================================================================

#[test]
fn test_twenty_percent_down_scenario_matches_closed_form() {
    let result = payment::compute_payment(&purchase(dec!(500000), dec!(100000), dec!(5))).unwrap();
    assert!(result.insurance.is_none());

    let r = dec!(0.05) / dec!(12);
    let factor = (Decimal::ONE + r).powu(300);
    let expected = dec!(400000) * r * factor / (factor - Decimal::ONE);
    assert!(
        (result.periodic_payment - expected).abs() < dec!(0.000001),
        "expected {expected}, got {}",
        result.periodic_payment
    );
    assert!((result.periodic_payment - dec!(2338.36)).abs() < dec!(0.01));
}

#[test]
fn test_zero_rate_identity() {
    let result = payment::compute_payment(&purchase(dec!(450000), dec!(90000), Decimal::ZERO)).unwrap();
    assert_eq!(result.periodic_payment, dec!(360000) / dec!(300));
    assert_eq!(result.total_interest, Decimal::ZERO);
}

#[test]
fn test_rate_monotonicity() {
    let mut previous: Option<(Decimal, Decimal)> = None;
    for rate in [dec!(0), dec!(1), dec!(2.5), dec!(4), dec!(5), dec!(7.25), dec!(12)] {
        let result = payment::compute_payment(&purchase(dec!(650000), dec!(65000), rate)).unwrap();
        if let Some((payment, interest)) = previous {
            assert!(result.periodic_payment > payment, "payment not increasing at {rate}%");
            assert!(result.total_interest > interest, "interest not increasing at {rate}%");
        }
        previous = Some((result.periodic_payment, result.total_interest));
    }
}

#[test]
fn test_frequency_consistency() {
    let mut req = purchase(dec!(800000), dec!(200000), dec!(4.79));
    let monthly = payment::compute_payment(&req).unwrap();

    req.payment_frequency = PaymentFrequency::Biweekly;
    let biweekly = payment::compute_payment(&req).unwrap();
    req.payment_frequency = PaymentFrequency::Weekly;
    let weekly = payment::compute_payment(&req).unwrap();

    assert_eq!(biweekly.periodic_payment, monthly.periodic_payment / dec!(2));
    assert_eq!(weekly.periodic_payment, monthly.periodic_payment / dec!(4));
    assert_eq!(biweekly.monthly_payment, monthly.monthly_payment);
    assert_eq!(weekly.total_interest, monthly.total_interest);
}

#[test]
fn test_total_cost_is_price_plus_interest() {
    let result = payment::compute_payment(&purchase(dec!(500000), dec!(100000), dec!(5))).unwrap();
    assert_eq!(result.total_cost, dec!(500000) + result.total_interest);
    assert_eq!(
        result.total_interest,
        result.monthly_payment * dec!(300) - dec!(400000)
    );
}

#[test]
fn test_idempotent() {
    let req = purchase(dec!(612345), dec!(48000), dec!(6.13));
    let first = payment::compute_payment(&req).unwrap();
    let second = payment::compute_payment(&req).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_json_round_trip_of_request() {
    let json = r#"{
        "home_price": "500000",
        "down_payment": "25000",
        "annual_interest_rate_pct": "5",
        "amortization_years": 25,
        "payment_frequency": "weekly"
    }"#;
    let req: PaymentRequest = serde_json::from_str(json).unwrap();
    assert_eq!(req.payment_frequency, PaymentFrequency::Weekly);
    let output = payment::analyze_payment(&req).unwrap();
    assert_eq!(output.result.mortgage_principal, dec!(494000));
    assert_eq!(output.warnings.len(), 2);
}
