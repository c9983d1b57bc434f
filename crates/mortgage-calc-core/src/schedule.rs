//! Period-by-period amortization schedule for a purchase mortgage.
//!
//! Monthly schedules retire the loan exactly over the amortization. The
//! accelerated frequencies pay half (biweekly) or a quarter (weekly) of the
//! monthly amount more often, so they retire the loan ahead of term; the
//! schedule stops at the payment that clears the balance.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageCalcError;
use crate::payment::{self, PaymentFrequency, PaymentRequest, PaymentResult};
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::MortgageCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub request: PaymentRequest,
    /// Date of the first payment; rows are undated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Balance after this payment.
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub payments: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub payment: PaymentResult,
    pub rows: Vec<ScheduleRow>,
    pub yearly: Vec<YearSummary>,
    /// Number of payments actually made before the balance reaches zero.
    pub payoff_periods: u32,
    pub total_interest_paid: Money,
    /// Interest avoided relative to the monthly schedule (zero for monthly).
    pub interest_saved: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn build_schedule(
    input: &ScheduleInput,
) -> MortgageCalcResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let req = &input.request;
    let payment = payment::compute_payment(req)?;

    let frequency = req.payment_frequency;
    let periods_per_year = frequency.periods_per_year();
    // Bounded by `payment::MAX_AMORTIZATION_YEARS`, checked in `compute_payment`.
    let nper = periods_per_year * req.amortization_years;
    let (rate, level_payment) = match frequency {
        PaymentFrequency::Monthly => (
            time_value::monthly_rate(req.annual_interest_rate_pct),
            payment.monthly_payment,
        ),
        _ => (
            time_value::periodic_rate(req.annual_interest_rate_pct, periods_per_year),
            payment.periodic_payment,
        ),
    };

    let mut rows = Vec::with_capacity(nper as usize);
    let mut balance = payment.mortgage_principal;
    let mut total_interest_paid = Decimal::ZERO;

    for period in 1..=nper {
        if balance <= Decimal::ZERO {
            break;
        }
        let interest = balance * rate;
        let mut principal = level_payment - interest;
        // Final payment clears whatever is left.
        if principal >= balance || period == nper {
            principal = balance;
        }
        balance -= principal;
        total_interest_paid += interest;

        let date = match input.first_payment_date {
            Some(first) => Some(payment_date(first, frequency, period - 1)?),
            None => None,
        };

        rows.push(ScheduleRow {
            period,
            date,
            payment: interest + principal,
            interest,
            principal,
            balance,
        });
    }

    let yearly = summarize_years(&rows, periods_per_year);
    let payoff_periods = rows.len() as u32;
    let interest_saved = (payment.total_interest - total_interest_paid).max(Decimal::ZERO);

    let mut warnings = Vec::new();
    if frequency != PaymentFrequency::Monthly && payoff_periods < nper {
        warnings.push(format!(
            "{:?} payments retire the loan after {} of {} scheduled payments",
            frequency, payoff_periods, nper
        ));
    }

    tracing::debug!(payoff_periods, %total_interest_paid, "amortization schedule built");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization schedule",
        input,
        warnings,
        elapsed,
        AmortizationSchedule {
            payment,
            rows,
            yearly,
            payoff_periods,
            total_interest_paid,
            interest_saved,
        },
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn payment_date(
    first: NaiveDate,
    frequency: PaymentFrequency,
    offset: u32,
) -> MortgageCalcResult<NaiveDate> {
    let date = match frequency {
        PaymentFrequency::Monthly => first.checked_add_months(Months::new(offset)),
        PaymentFrequency::Biweekly => first.checked_add_days(Days::new(14 * u64::from(offset))),
        PaymentFrequency::Weekly => first.checked_add_days(Days::new(7 * u64::from(offset))),
    };
    date.ok_or_else(|| {
        MortgageCalcError::invalid("first_payment_date", "Payment dates overflow the calendar")
    })
}

fn summarize_years(rows: &[ScheduleRow], periods_per_year: u32) -> Vec<YearSummary> {
    let mut yearly: Vec<YearSummary> = Vec::new();
    for row in rows {
        let year = (row.period - 1) / periods_per_year + 1;
        match yearly.last_mut() {
            Some(summary) if summary.year == year => {
                summary.payments += row.payment;
                summary.interest += row.interest;
                summary.principal += row.principal;
                summary.closing_balance = row.balance;
            }
            _ => yearly.push(YearSummary {
                year,
                payments: row.payment,
                interest: row.interest,
                principal: row.principal,
                closing_balance: row.balance,
            }),
        }
    }
    yearly
}
