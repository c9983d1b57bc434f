use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;

use mortgage_calc_core::affordability::{self, AffordabilityRequest, SearchGrid};

use crate::input;

/// Arguments for the affordability search
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross annual household income
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Existing monthly debt payments
    #[arg(long, default_value_t = dec!(0))]
    pub monthly_debt: Decimal,

    /// Savings available for the down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (5 = 5%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Annual property tax as percent of price
    #[arg(long, default_value_t = dec!(1))]
    pub property_tax_rate: Decimal,

    /// Lowest candidate price
    #[arg(long)]
    pub floor: Option<Decimal>,

    /// Candidate price increment; result precision
    #[arg(long)]
    pub step: Option<Decimal>,

    /// Highest candidate price
    #[arg(long)]
    pub ceiling: Option<Decimal>,
}

/// File/stdin shape: the request fields plus an optional `grid`.
#[derive(Deserialize)]
struct AffordabilityFile {
    #[serde(flatten)]
    request: AffordabilityRequest,
    #[serde(default)]
    grid: Option<SearchGrid>,
}

impl AffordabilityArgs {
    fn grid(&self) -> SearchGrid {
        let defaults = SearchGrid::default();
        SearchGrid {
            floor: self.floor.unwrap_or(defaults.floor),
            step: self.step.unwrap_or(defaults.step),
            ceiling: self.ceiling.unwrap_or(defaults.ceiling),
        }
    }
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let file: Option<AffordabilityFile> = if let Some(ref path) = args.input {
        Some(input::file::read_input(path)?)
    } else {
        input::stdin::read_stdin()?
    };

    let (request, grid) = match file {
        Some(f) => (f.request, f.grid.unwrap_or_else(|| args.grid())),
        None => (
            AffordabilityRequest {
                annual_income: args
                    .annual_income
                    .ok_or("--annual-income is required (or provide --input)")?,
                monthly_debt: args.monthly_debt,
                available_down_payment: args
                    .down_payment
                    .ok_or("--down-payment is required (or provide --input)")?,
                annual_interest_rate_pct: args
                    .interest_rate
                    .ok_or("--interest-rate is required (or provide --input)")?,
                property_tax_rate_pct: args.property_tax_rate,
            },
            args.grid(),
        ),
    };

    let result = affordability::analyze_affordability(&request, Some(&grid))?;
    Ok(serde_json::to_value(result)?)
}
