//! Level-payment amortization schedules.
//!
//! Builds the monthly payment schedule for a consumer installment loan:
//! annuity payment on the financed base, per-period interest/principal split
//! with cent rounding at every step, and a balancing final payment so the
//! closing balance lands on exactly zero. All math in `rust_decimal::Decimal`.

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::dates::due_date;
use crate::rounding::round_cents;
use crate::types::{with_metadata, ComputationOutput, LoanTerms, Money};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A single scheduled payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment number (1-indexed).
    pub month: u32,
    /// Date the payment falls due.
    pub due_date: NaiveDate,
    /// Total payment due this period.
    pub payment: Money,
    /// Interest portion.
    pub interest: Money,
    /// Principal portion.
    pub principal: Money,
    /// Balance remaining after this payment.
    pub closing_balance: Money,
}

/// Amortization schedule output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    /// One record per payment period.
    pub periods: Vec<PaymentRecord>,
    /// The level annuity payment (the final payment may differ by cents).
    pub level_payment: Money,
    /// Sum of all payments.
    pub total_paid: Money,
    /// Sum of all interest portions.
    pub total_interest_paid: Money,
    /// Sum of all principal portions (equals the financed base).
    pub total_principal_paid: Money,
}

impl ScheduleOutput {
    /// Payment amounts in period order, as fed to the rate solver.
    pub fn payment_stream(&self) -> Vec<Money> {
        self.periods.iter().map(|p| p.payment).collect()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the amortization schedule for the given terms.
///
/// Never fails: out-of-range inputs normalize (negative rates to 0%, a zero
/// term to one period, a negative financed base to zero) and the notices
/// surface in the envelope's warnings.
pub fn build_schedule(terms: &LoanTerms) -> ComputationOutput<ScheduleOutput> {
    let start = Instant::now();
    let (output, warnings) = compute(terms);
    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Level-Payment Monthly Amortization",
        terms,
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Schedule construction
// ---------------------------------------------------------------------------

pub(crate) fn compute(terms: &LoanTerms) -> (ScheduleOutput, Vec<String>) {
    let warnings = terms.normalization_warnings();

    let base = terms.principal_financed_base();
    let rate = terms.periodic_rate();
    let n = terms.term_periods();
    let start = terms.start_or_today();

    let level_payment = level_payment(base, rate, n);

    let mut periods = Vec::with_capacity(n as usize);
    let mut balance = base;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for month in 1..=n {
        let interest = round_cents(balance * rate);

        // The final payment retires the remaining balance exactly; earlier
        // periods pay the level amount, with principal capped by the balance.
        let (payment, principal) = if month == n {
            (round_cents(balance + interest), balance)
        } else {
            (level_payment, round_cents(level_payment - interest).min(balance))
        };

        balance = round_cents(balance - principal);
        total_paid += payment;
        total_interest += interest;
        total_principal += principal;

        periods.push(PaymentRecord {
            month,
            due_date: due_date(start, month),
            payment,
            interest,
            principal,
            closing_balance: balance,
        });
    }

    (
        ScheduleOutput {
            periods,
            level_payment,
            total_paid,
            total_interest_paid: total_interest,
            total_principal_paid: total_principal,
        },
        warnings,
    )
}

/// Level annuity payment on `base` over `n` periods at periodic rate `rate`.
fn level_payment(base: Money, rate: Decimal, n: u32) -> Money {
    if rate.is_zero() {
        return round_cents(base / Decimal::from(n));
    }

    // (1 + r)^-n via the reciprocal so very long terms underflow toward zero
    // instead of overflowing.
    let discount = (Decimal::ONE / (Decimal::ONE + rate))
        .checked_powi(n as i64)
        .unwrap_or(Decimal::ZERO);
    let denominator = Decimal::ONE - discount;
    if denominator.is_zero() {
        return round_cents(base / Decimal::from(n));
    }

    round_cents(base * rate / denominator)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard_terms() -> LoanTerms {
        LoanTerms {
            principal_amount: dec!(8000),
            nominal_annual_rate_percent: dec!(6.5),
            term_months: 12,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15),
            ..LoanTerms::default()
        }
    }

    // -----------------------------------------------------------------------
    // 1. Level payment for the standard 12-month loan
    // -----------------------------------------------------------------------
    #[test]
    fn test_level_payment_standard() {
        let (out, warnings) = compute(&standard_terms());
        assert_eq!(out.level_payment, dec!(690.37));
        assert!(warnings.is_empty());
    }

    // -----------------------------------------------------------------------
    // 2. First period interest/principal split
    // -----------------------------------------------------------------------
    #[test]
    fn test_first_period_split() {
        let (out, _) = compute(&standard_terms());
        let first = &out.periods[0];
        assert_eq!(first.payment, dec!(690.37));
        assert_eq!(first.interest, dec!(43.33));
        assert_eq!(first.principal, dec!(647.04));
        assert_eq!(first.closing_balance, dec!(7352.96));
    }

    // -----------------------------------------------------------------------
    // 3. Final period retires the balance with an adjusted payment
    // -----------------------------------------------------------------------
    #[test]
    fn test_final_period_balances() {
        let (out, _) = compute(&standard_terms());
        let last = out.periods.last().unwrap();
        assert_eq!(last.month, 12);
        assert_eq!(last.principal, dec!(686.67));
        assert_eq!(last.interest, dec!(3.72));
        assert_eq!(last.payment, dec!(690.39));
        assert_eq!(last.closing_balance, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 4. Principal portions sum exactly to the financed base
    // -----------------------------------------------------------------------
    #[test]
    fn test_principal_sums_to_base() {
        let (out, _) = compute(&standard_terms());
        assert_eq!(out.total_principal_paid, dec!(8000));
    }

    // -----------------------------------------------------------------------
    // 5. Interest and payment totals
    // -----------------------------------------------------------------------
    #[test]
    fn test_totals() {
        let (out, _) = compute(&standard_terms());
        assert_eq!(out.total_interest_paid, dec!(284.46));
        assert_eq!(out.total_paid, dec!(8284.46));
    }

    // -----------------------------------------------------------------------
    // 6. Zero-rate loans amortize straight-line with a remainder tail
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_rate_straight_line() {
        let terms = LoanTerms {
            principal_amount: dec!(1000),
            nominal_annual_rate_percent: Decimal::ZERO,
            term_months: 12,
            ..LoanTerms::default()
        };
        let (out, _) = compute(&terms);

        assert_eq!(out.level_payment, dec!(83.33));
        for record in &out.periods[..11] {
            assert_eq!(record.payment, dec!(83.33));
            assert_eq!(record.interest, Decimal::ZERO);
        }
        // 11 x 83.33 leaves 83.37 for the final payment.
        let last = out.periods.last().unwrap();
        assert_eq!(last.payment, dec!(83.37));
        assert_eq!(out.total_principal_paid, dec!(1000));
        assert_eq!(out.total_interest_paid, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 7. One-month loan is a single balloon payment
    // -----------------------------------------------------------------------
    #[test]
    fn test_single_period_term() {
        let terms = LoanTerms {
            principal_amount: dec!(5000),
            nominal_annual_rate_percent: dec!(12),
            term_months: 1,
            ..LoanTerms::default()
        };
        let (out, _) = compute(&terms);

        assert_eq!(out.periods.len(), 1);
        let only = &out.periods[0];
        assert_eq!(only.interest, dec!(50.00));
        assert_eq!(only.principal, dec!(5000));
        assert_eq!(only.payment, dec!(5050.00));
        assert_eq!(only.closing_balance, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 8. Zero term normalizes to one period with a warning
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_term_floors_to_one_period() {
        let terms = LoanTerms {
            principal_amount: dec!(1200),
            term_months: 0,
            ..LoanTerms::default()
        };
        let (out, warnings) = compute(&terms);
        assert_eq!(out.periods.len(), 1);
        assert_eq!(out.periods[0].payment, dec!(1200));
        assert!(warnings.iter().any(|w| w.contains("single payment period")));
    }

    // -----------------------------------------------------------------------
    // 9. Zero financed base produces an all-zero schedule, not a failure
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_base_schedule() {
        let terms = LoanTerms {
            principal_amount: dec!(500),
            down_payment: dec!(900),
            nominal_annual_rate_percent: dec!(9),
            term_months: 6,
            ..LoanTerms::default()
        };
        let (out, warnings) = compute(&terms);

        assert_eq!(out.periods.len(), 6);
        for record in &out.periods {
            assert_eq!(record.payment, Decimal::ZERO);
            assert_eq!(record.closing_balance, Decimal::ZERO);
        }
        assert!(warnings.iter().any(|w| w.contains("clamped to zero")));
    }

    // -----------------------------------------------------------------------
    // 10. Down payment and financed fees shift the base
    // -----------------------------------------------------------------------
    #[test]
    fn test_down_payment_and_fees_shift_base() {
        let terms = LoanTerms {
            principal_amount: dec!(15000),
            down_payment: dec!(2000),
            other_financed_fees: dec!(150),
            nominal_annual_rate_percent: dec!(7.9),
            term_months: 36,
            ..LoanTerms::default()
        };
        let (out, _) = compute(&terms);

        assert_eq!(out.level_payment, dec!(411.47));
        assert_eq!(out.total_principal_paid, dec!(13150));
        assert_eq!(out.total_interest_paid, dec!(1662.78));
    }

    // -----------------------------------------------------------------------
    // 11. Balance is non-increasing and ends at exactly zero
    // -----------------------------------------------------------------------
    #[test]
    fn test_balance_monotonic_to_zero() {
        let (out, _) = compute(&standard_terms());
        let mut prev = dec!(8000);
        for record in &out.periods {
            assert!(
                record.closing_balance <= prev,
                "Month {}: balance {} should be <= {}",
                record.month,
                record.closing_balance,
                prev
            );
            prev = record.closing_balance;
        }
        assert_eq!(prev, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 12. Due dates advance by calendar month from the start date
    // -----------------------------------------------------------------------
    #[test]
    fn test_due_dates_advance_monthly() {
        let (out, _) = compute(&standard_terms());
        assert_eq!(out.periods[0].due_date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(out.periods[1].due_date, NaiveDate::from_ymd_opt(2025, 2, 15).unwrap());
        assert_eq!(out.periods[11].due_date, NaiveDate::from_ymd_opt(2025, 12, 15).unwrap());
    }

    // -----------------------------------------------------------------------
    // 13. Negative rate normalizes to 0% with a warning
    // -----------------------------------------------------------------------
    #[test]
    fn test_negative_rate_normalizes() {
        let terms = LoanTerms {
            principal_amount: dec!(1200),
            nominal_annual_rate_percent: dec!(-5),
            term_months: 12,
            ..LoanTerms::default()
        };
        let (out, warnings) = compute(&terms);
        assert_eq!(out.total_interest_paid, Decimal::ZERO);
        assert!(warnings.iter().any(|w| w.contains("negative")));
    }

    // -----------------------------------------------------------------------
    // 14. Envelope carries methodology and metadata
    // -----------------------------------------------------------------------
    #[test]
    fn test_envelope_populated() {
        let out = build_schedule(&standard_terms());
        assert!(out.methodology.contains("Amortization"));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert!(out.warnings.is_empty());
    }

    // -----------------------------------------------------------------------
    // 15. Payment stream mirrors the per-period payments
    // -----------------------------------------------------------------------
    #[test]
    fn test_payment_stream() {
        let (out, _) = compute(&standard_terms());
        let stream = out.payment_stream();
        assert_eq!(stream.len(), 12);
        assert_eq!(stream[0], dec!(690.37));
        assert_eq!(stream[11], dec!(690.39));
    }
}
