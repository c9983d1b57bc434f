use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use mortgage_calc_core::insurance;
use mortgage_calc_core::payment::{self, PaymentFrequency, PaymentRequest};
use mortgage_calc_core::schedule::{self, ScheduleInput};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    Biweekly,
    Weekly,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::Biweekly => PaymentFrequency::Biweekly,
            FrequencyArg::Weekly => PaymentFrequency::Weekly,
        }
    }
}

/// Purchase terms shared by `payment` and `schedule`
#[derive(Args)]
pub struct PurchaseArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price in dollars
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment in dollars
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (5 = 5%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Amortization period in years
    #[arg(long, default_value_t = 25)]
    pub amortization_years: u32,

    /// Payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,
}

impl PurchaseArgs {
    fn to_request(&self) -> Result<PaymentRequest, Box<dyn std::error::Error>> {
        Ok(PaymentRequest {
            home_price: self
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment: self
                .down_payment
                .ok_or("--down-payment is required (or provide --input)")?,
            annual_interest_rate_pct: self
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            amortization_years: self.amortization_years,
            payment_frequency: self.frequency.into(),
        })
    }
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub purchase: PurchaseArgs,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

/// Arguments for the insurance premium lookup
#[derive(Args)]
pub struct PremiumArgs {
    /// Loan-to-value in percent (e.g. 92.5)
    #[arg(long, conflicts_with_all = ["home_price", "down_payment"])]
    pub ltv: Option<Decimal>,

    /// Purchase price in dollars (with --down-payment)
    #[arg(long, requires = "down_payment")]
    pub home_price: Option<Decimal>,

    /// Down payment in dollars (with --home-price)
    #[arg(long, requires = "home_price")]
    pub down_payment: Option<Decimal>,
}

pub fn run_payment(args: PurchaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PaymentRequest = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        args.to_request()?
    };

    let result = payment::analyze_payment(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = if let Some(ref path) = args.purchase.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        ScheduleInput {
            request: args.purchase.to_request()?,
            first_payment_date: args.first_payment_date,
        }
    };

    let result = schedule::build_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_premium(args: PremiumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ltv) = args.ltv {
        let rate = insurance::premium_rate(ltv)?;
        return Ok(json!({ "result": { "loan_to_value_pct": ltv, "premium_rate": rate } }));
    }

    let (Some(price), Some(down)) = (args.home_price, args.down_payment) else {
        return Err("--ltv or --home-price with --down-payment is required".into());
    };

    let minimum_down_payment = insurance::minimum_down_payment(price);
    let result = match insurance::assess_insurance(price, down)? {
        Some(premium) => json!({
            "insurance_required": true,
            "loan_to_value_pct": premium.loan_to_value_pct,
            "premium_rate": premium.premium_rate,
            "premium_amount": premium.premium_amount,
            "minimum_down_payment": minimum_down_payment,
        }),
        None => json!({
            "insurance_required": false,
            "premium_rate": Decimal::ZERO,
            "minimum_down_payment": minimum_down_payment,
        }),
    };
    Ok(json!({ "result": result }))
}
