//! Maximum affordable purchase price under GDS/TDS debt-service limits.
//!
//! The search walks candidate prices on a fixed grid and keeps the largest
//! price whose required down payment fits the borrower's savings. The
//! result is quantized to the grid step (10,000 by default).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageCalcError;
use crate::time_value;
use crate::types::{pct_to_rate, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageCalcResult;

// ---------------------------------------------------------------------------
// Policy constants
// ---------------------------------------------------------------------------

/// Housing costs may not exceed this share of gross monthly income.
pub const GDS_RATIO: Rate = dec!(0.32);

/// All debt obligations may not exceed this share of gross monthly income.
pub const TDS_RATIO: Rate = dec!(0.40);

/// Heating cost assumed in every housing budget.
pub const MONTHLY_HEATING_ESTIMATE: Money = dec!(150);

/// Qualification is tested over this amortization regardless of the loan sought.
pub const QUALIFYING_AMORTIZATION_YEARS: u32 = 25;

/// Below this share of the price the purchase needs default insurance.
const CONVENTIONAL_DOWN_PAYMENT_RATIO: Rate = dec!(0.20);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityRequest {
    /// Gross annual household income in dollars.
    pub annual_income: Money,
    /// Existing monthly debt payments (cards, car loans...) in dollars.
    pub monthly_debt: Money,
    /// Cash available for the down payment in dollars.
    pub available_down_payment: Money,
    /// Annual interest rate in percent (e.g. 5 = 5%).
    pub annual_interest_rate_pct: Percent,
    /// Annual property tax as percent of price (e.g. 1 = 1%).
    pub property_tax_rate_pct: Percent,
}

/// Candidate price grid for the affordability search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGrid {
    pub floor: Money,
    pub step: Money,
    pub ceiling: Money,
}

impl Default for SearchGrid {
    fn default() -> Self {
        SearchGrid {
            floor: dec!(100000),
            step: dec!(10000),
            ceiling: dec!(3000000),
        }
    }
}

impl SearchGrid {
    fn validate(&self) -> MortgageCalcResult<()> {
        if self.floor < Decimal::ZERO {
            return Err(MortgageCalcError::invalid("floor", "Search floor cannot be negative"));
        }
        if self.step <= Decimal::ZERO {
            return Err(MortgageCalcError::invalid("step", "Search step must be positive"));
        }
        if self.ceiling < self.floor {
            return Err(MortgageCalcError::invalid(
                "ceiling",
                "Search ceiling must be at least the floor",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    /// Largest grid price the borrower qualifies for; zero if none.
    pub max_home_price: Money,
    /// Monthly GDS ceiling (32% of gross monthly income).
    pub max_gross_debt_service_payment: Money,
    /// Monthly TDS ceiling (40% of gross monthly income).
    pub max_total_debt_service_payment: Money,
    /// Mortgage needed at `max_home_price` after the down payment.
    pub max_mortgage_amount: Money,
    /// Binding monthly housing budget, min(GDS, TDS - debt).
    pub max_monthly_housing_payment: Money,
    pub qualifies: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Maximum affordable price on the default grid.
pub fn compute_affordability(req: &AffordabilityRequest) -> MortgageCalcResult<AffordabilityResult> {
    compute_affordability_with(req, &SearchGrid::default())
}

/// Maximum affordable price on a caller-supplied grid. Pure and deterministic.
pub fn compute_affordability_with(
    req: &AffordabilityRequest,
    grid: &SearchGrid,
) -> MortgageCalcResult<AffordabilityResult> {
    validate(req)?;
    grid.validate()?;

    let monthly_income = req.annual_income / dec!(12);
    let max_gds = monthly_income * GDS_RATIO;
    let max_tds = monthly_income * TDS_RATIO;
    let available_for_housing = max_tds - req.monthly_debt;
    let max_monthly = max_gds.min(available_for_housing);

    let max_home_price = if max_monthly > Decimal::ZERO {
        search_max_price(req, grid, max_monthly)?
    } else {
        tracing::debug!(%max_monthly, "no room for housing costs");
        Decimal::ZERO
    };

    Ok(AffordabilityResult {
        max_home_price,
        max_gross_debt_service_payment: max_gds,
        max_total_debt_service_payment: max_tds,
        max_mortgage_amount: (max_home_price - req.available_down_payment).max(Decimal::ZERO),
        max_monthly_housing_payment: max_monthly.max(Decimal::ZERO),
        qualifies: max_home_price > Decimal::ZERO,
    })
}

/// Run the affordability search and wrap it in the standard output envelope.
pub fn analyze_affordability(
    req: &AffordabilityRequest,
    grid: Option<&SearchGrid>,
) -> MortgageCalcResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();
    let default_grid = SearchGrid::default();
    let grid = grid.unwrap_or(&default_grid);
    let result = compute_affordability_with(req, grid)?;

    let mut warnings = Vec::new();
    if !result.qualifies {
        warnings.push(format!(
            "Borrower does not qualify for any price between {} and {}",
            grid.floor, grid.ceiling
        ));
    } else {
        if result.max_home_price >= grid.ceiling {
            warnings.push(format!(
                "Search reached the {} ceiling; the true maximum may be higher",
                grid.ceiling
            ));
        }
        if req.available_down_payment < result.max_home_price * CONVENTIONAL_DOWN_PAYMENT_RATIO {
            warnings.push(
                "Down payment is below 20% of the maximum price; mortgage insurance will apply"
                    .into(),
            );
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!(
            "GDS {}% / TDS {}% linear price search, step {}, {}-year qualifying amortization",
            (GDS_RATIO * dec!(100)).normalize(),
            (TDS_RATIO * dec!(100)).normalize(),
            grid.step,
            QUALIFYING_AMORTIZATION_YEARS
        ),
        req,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

fn search_max_price(
    req: &AffordabilityRequest,
    grid: &SearchGrid,
    max_monthly: Money,
) -> MortgageCalcResult<Money> {
    let rate = time_value::monthly_rate(req.annual_interest_rate_pct);
    let months = QUALIFYING_AMORTIZATION_YEARS * 12;
    let tax_rate = pct_to_rate(req.property_tax_rate_pct);

    let mut best = Decimal::ZERO;
    let mut price = grid.floor;

    while price <= grid.ceiling {
        let monthly_tax = price * tax_rate / dec!(12);
        let available_for_mortgage = max_monthly - monthly_tax - MONTHLY_HEATING_ESTIMATE;

        if available_for_mortgage <= Decimal::ZERO {
            tracing::trace!(%price, %available_for_mortgage, "skipping candidate");
            price += grid.step;
            continue;
        }

        let max_mortgage = time_value::annuity_principal(available_for_mortgage, rate, months)?;
        let required_down = price - max_mortgage;
        tracing::trace!(%price, %max_mortgage, %required_down, "candidate");

        if required_down > req.available_down_payment {
            break;
        }
        best = price;
        price += grid.step;
    }

    tracing::debug!(max_home_price = %best, "affordability search finished");
    Ok(best)
}

fn validate(req: &AffordabilityRequest) -> MortgageCalcResult<()> {
    let fields = [
        ("annual_income", req.annual_income),
        ("monthly_debt", req.monthly_debt),
        ("available_down_payment", req.available_down_payment),
        ("annual_interest_rate_pct", req.annual_interest_rate_pct),
        ("property_tax_rate_pct", req.property_tax_rate_pct),
    ];
    for (field, value) in fields {
        if value < Decimal::ZERO {
            return Err(MortgageCalcError::invalid(field, "Value cannot be negative"));
        }
    }
    Ok(())
}
