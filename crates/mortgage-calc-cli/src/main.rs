mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::affordability::AffordabilityArgs;
use commands::payment::{PremiumArgs, PurchaseArgs, ScheduleArgs};

/// Mortgage payment and affordability calculations
#[derive(Parser)]
#[command(
    name = "mcalc",
    version,
    about = "Mortgage payment and affordability calculations",
    long_about = "A CLI for mortgage calculations with decimal precision. Computes \
                  periodic payments with capitalized default-insurance premiums, \
                  amortization schedules, premium-rate lookups, and the maximum \
                  affordable purchase price under GDS/TDS limits."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation steps to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Periodic mortgage payment, insurance premium and total interest
    Payment(PurchaseArgs),
    /// Maximum affordable home price under GDS/TDS limits
    Affordability(AffordabilityArgs),
    /// Full amortization schedule with yearly totals
    Schedule(ScheduleArgs),
    /// Mortgage insurance premium rate lookup
    Premium(PremiumArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "mcalc=debug,mortgage_calc_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::Schedule(args) => commands::payment::run_schedule(args),
        Commands::Premium(args) => commands::payment::run_premium(args),
        Commands::Version => {
            println!("mcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
