use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use tila_core::schedule;
use tila_core::{disclosure, LoanTerms, PrepayPenalty};

use crate::input;

/// Loan terms shared by the schedule, disclose, and link commands.
///
/// Terms can come from a JSON or YAML file (`--input`), from piped stdin
/// (JSON), or from individual flags. A file or stdin document wins over
/// flags; when building from flags, only `--amount`, `--rate`, and
/// `--term-months` are required.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TermsArgs {
    /// Path to a JSON or YAML file with the loan terms
    #[arg(long)]
    pub input: Option<String>,

    /// Contract amount before the down payment
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Down payment deducted at signing
    #[arg(long)]
    pub down: Option<Decimal>,

    /// Financed fees that are not finance charges (e.g. permits)
    #[arg(long)]
    pub other_fees: Option<Decimal>,

    /// Prepaid finance charge withheld from the proceeds at closing
    #[arg(long, alias = "pfc")]
    pub prepaid_finance_charge: Option<Decimal>,

    /// Nominal annual rate in percent (6.5 means 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long)]
    pub term_months: Option<u32>,

    /// First payment due date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Flat late fee charged after the grace period
    #[arg(long)]
    pub late_fee: Option<Decimal>,

    /// Days past due before the late fee applies
    #[arg(long)]
    pub grace_days: Option<u32>,

    /// The agreement carries a prepayment penalty clause
    #[arg(long)]
    pub prepay_penalty: bool,

    /// Borrower name for the disclosure header
    #[arg(long)]
    pub customer_name: Option<String>,

    /// Project or property address
    #[arg(long)]
    pub project_address: Option<String>,

    /// Description of the security interest taken
    #[arg(long)]
    pub security: Option<String>,
}

impl TermsArgs {
    /// Resolve the terms from file, stdin, or flags, in that order.
    pub fn resolve(&self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_input(path);
        }

        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }

        Ok(LoanTerms {
            customer_name: self.customer_name.clone(),
            project_address: self.project_address.clone(),
            start_date: self.start_date,
            principal_amount: self
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            down_payment: self.down.unwrap_or_default(),
            other_financed_fees: self.other_fees.unwrap_or_default(),
            prepaid_finance_charge: self.prepaid_finance_charge.unwrap_or_default(),
            nominal_annual_rate_percent: self
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            term_months: self
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            late_fee_amount: self.late_fee.unwrap_or_default(),
            grace_days: self.grace_days.unwrap_or_default(),
            prepay_penalty: if self.prepay_penalty {
                PrepayPenalty::Penalty
            } else {
                PrepayPenalty::None
            },
            security_interest_text: self.security.clone(),
        })
    }
}

pub fn run_schedule(args: TermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.resolve()?;
    let result = schedule::build_schedule(&terms);
    Ok(serde_json::to_value(result)?)
}

pub fn run_disclose(args: TermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.resolve()?;
    let result = disclosure::run_disclosure(&terms)?;
    Ok(serde_json::to_value(result)?)
}
