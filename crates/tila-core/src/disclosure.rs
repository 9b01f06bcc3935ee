//! Truth-in-Lending disclosure figures.
//!
//! Assembles the Regulation Z box from a finished schedule: amount financed,
//! finance charge, total of payments, and the effective APR solved from the
//! actual (cent-rounded) payment stream, plus the formatted notices a
//! disclosure document carries verbatim.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TilaError;
use crate::rounding::round_cents;
use crate::schedule::{self, ScheduleOutput};
use crate::solver;
use crate::types::{with_metadata, ComputationOutput, LoanTerms, Money, PrepayPenalty, Rate};
use crate::TilaResult;

/// Placeholder for pass-through fields left blank on the form.
const EMPTY_FIELD: &str = "\u{2014}";

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The disclosure figures and notices for one loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disclosure {
    /// Effective APR: the actuarial-method annual rate, as a percentage.
    pub effective_annual_rate_percent: Rate,
    /// Cost of credit in dollars: interest plus the prepaid finance charge.
    pub finance_charge: Money,
    /// Credit actually extended: financed base less the prepaid charge.
    pub amount_financed: Money,
    /// Everything the borrower will have paid, prepaid charge included.
    pub total_of_payments: Money,
    /// Interest across the schedule.
    pub total_interest: Money,
    /// The level monthly payment.
    pub monthly_payment: Money,
    /// Number of scheduled payments.
    pub payments_count: u32,
    /// First payment date.
    pub first_due_date: NaiveDate,
    /// Last payment date.
    pub final_due_date: NaiveDate,
    /// Borrower name as echoed onto the document.
    pub customer_name: String,
    /// Project or property address as echoed onto the document.
    pub project_address: String,
    /// "N monthly payment(s) of $X" notice.
    pub payment_schedule_text: String,
    /// Late-charge notice.
    pub late_fee_text: String,
    /// Prepayment notice.
    pub prepayment_text: String,
    /// Security-interest description.
    pub security_interest_text: String,
}

/// Composite output: the disclosure plus the schedule it was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisclosureOutput {
    pub disclosure: Disclosure,
    pub schedule: ScheduleOutput,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Full disclosure pipeline: build the schedule, solve the effective rate
/// against the amount financed, and aggregate the disclosure figures.
pub fn run_disclosure(terms: &LoanTerms) -> TilaResult<ComputationOutput<DisclosureOutput>> {
    let start = Instant::now();

    let (schedule, mut warnings) = schedule::compute(terms);

    let amount_financed = terms.amount_financed();
    if round_cents(terms.principal_financed_base() - terms.prepaid_finance_charge)
        < Decimal::ZERO
    {
        warnings.push(
            "Prepaid finance charge exceeds the financed base; amount financed clamped to zero"
                .to_string(),
        );
    }

    let periodic_rate = solver::solve_periodic_rate(amount_financed, &schedule.payment_stream());
    let disclosure = aggregate(terms, &schedule, periodic_rate)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Truth-in-Lending Disclosure (Actuarial-Method APR)",
        terms,
        warnings,
        elapsed,
        DisclosureOutput {
            disclosure,
            schedule,
        },
    ))
}

/// Aggregate disclosure figures from a finished schedule and solved rate.
pub fn aggregate(
    terms: &LoanTerms,
    schedule: &ScheduleOutput,
    periodic_rate: Rate,
) -> TilaResult<Disclosure> {
    let (first, last) = match (schedule.periods.first(), schedule.periods.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(TilaError::InsufficientData(
                "Cannot aggregate a disclosure from an empty schedule".into(),
            ))
        }
    };

    let total_interest = schedule.total_interest_paid;
    let finance_charge = round_cents(total_interest + terms.prepaid_finance_charge);
    let total_of_payments = round_cents(schedule.total_paid + terms.prepaid_finance_charge);
    let payments_count = schedule.periods.len() as u32;

    let payment_schedule_text = format!(
        "{} monthly payment(s) of {}",
        payments_count,
        format_usd(schedule.level_payment)
    );

    let late_fee_text = if terms.late_fee_amount > Decimal::ZERO {
        format!(
            "{} after {} day(s) past due.",
            format_usd(terms.late_fee_amount),
            terms.grace_days
        )
    } else {
        "No late fee specified.".to_string()
    };

    let prepayment_text = match terms.prepay_penalty {
        PrepayPenalty::Penalty => "Prepayment penalty applies per agreement.",
        PrepayPenalty::None => "No penalty. Interest savings may apply.",
    }
    .to_string();

    Ok(Disclosure {
        effective_annual_rate_percent: periodic_rate * dec!(1200),
        finance_charge,
        amount_financed: terms.amount_financed(),
        total_of_payments,
        total_interest,
        monthly_payment: schedule.level_payment,
        payments_count,
        first_due_date: first.due_date,
        final_due_date: last.due_date,
        customer_name: text_or_placeholder(terms.customer_name.as_deref()),
        project_address: text_or_placeholder(terms.project_address.as_deref()),
        payment_schedule_text,
        late_fee_text,
        prepayment_text,
        security_interest_text: text_or_placeholder(terms.security_interest_text.as_deref()),
    })
}

/// Dollar formatting with thousands separators, as printed on the document.
pub fn format_usd(amount: Money) -> String {
    let rounded = round_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", sign, grouped, frac_part)
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => EMPTY_FIELD.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
