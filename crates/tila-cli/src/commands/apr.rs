use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use tila_core::solver::{self, RateSolveInput};

use crate::input;

/// Arguments for the standalone rate solver.
///
/// The payment stream comes either as an explicit comma-separated list
/// (`--payments`) or as a level annuity (`--payment` with `--periods`).
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AprArgs {
    /// Path to a JSON or YAML file with {"target": ..., "payments": [...]}
    #[arg(long)]
    pub input: Option<String>,

    /// Target present value the rate must reproduce (the amount financed)
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Comma-separated monthly payment amounts
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub payments: Option<Vec<Decimal>>,

    /// Level payment amount, repeated --periods times
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Number of level payments (used with --payment)
    #[arg(long)]
    pub periods: Option<u32>,
}

pub fn run_apr(args: AprArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let solve_input: RateSolveInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let target = args
            .target
            .ok_or("--target is required (or provide --input)")?;
        let payments = match args.payments {
            Some(list) => list,
            None => {
                let payment = args
                    .payment
                    .ok_or("--payments or --payment with --periods is required")?;
                let periods = args.periods.ok_or("--periods is required with --payment")?;
                vec![payment; periods as usize]
            }
        };
        RateSolveInput { target, payments }
    };

    let result = solver::solve_rate(&solve_input);
    Ok(serde_json::to_value(result)?)
}
