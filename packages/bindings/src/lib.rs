use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use mortgage_calc_core::affordability::{self, AffordabilityRequest, SearchGrid};
use mortgage_calc_core::{insurance, payment, schedule};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_payment(input_json: String) -> NapiResult<String> {
    let input: payment::PaymentRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payment::analyze_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Premium rate for a loan-to-value given as a percent string, e.g. "92.5".
#[napi]
pub fn insurance_premium_rate(loan_to_value_pct: String) -> NapiResult<String> {
    let ltv: Decimal = loan_to_value_pct.trim().parse().map_err(to_napi_error)?;
    let rate = insurance::premium_rate(ltv).map_err(to_napi_error)?;
    Ok(rate.to_string())
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AffordabilityPayload {
    #[serde(flatten)]
    request: AffordabilityRequest,
    #[serde(default)]
    grid: Option<SearchGrid>,
}

#[napi]
pub fn compute_affordability(input_json: String) -> NapiResult<String> {
    let input: AffordabilityPayload =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = affordability::analyze_affordability(&input.request, input.grid.as_ref())
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
