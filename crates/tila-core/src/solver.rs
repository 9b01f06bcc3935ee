//! Effective-rate solver behind the APR disclosure.
//!
//! Finds the monthly rate at which the present value of the payment stream
//! equals a target (the amount financed), by bisection on [0, 1). With the
//! prepaid finance charge excluded from the target, the solved rate is the
//! actuarial-method effective rate Regulation Z asks for.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Rate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Present-value convergence tolerance (dollars).
const PV_TOLERANCE: Decimal = dec!(0.000001);

/// Bracket-width convergence tolerance (periodic rate).
const BRACKET_TOLERANCE: Decimal = dec!(0.0000000001);

/// Maximum bisection iterations.
const BISECTION_MAX_ITER: u32 = 200;

/// Upper search bound: 100% per month (1200% annualized).
const BRACKET_HI: Decimal = Decimal::ONE;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Rate-solve input: the target present value and the payment stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSolveInput {
    /// Target present value (the amount financed for an APR solve).
    pub target: Money,
    /// Payment amounts, one month apart, first payment one month out.
    pub payments: Vec<Money>,
}

/// Rate-solve output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSolveOutput {
    /// Solved monthly periodic rate.
    pub periodic_rate: Rate,
    /// Solved rate annualized as a percentage (periodic x 1200).
    pub annual_rate_percent: Rate,
    /// Present value of the stream at the solved rate.
    pub present_value_at_rate: Money,
    /// Bisection iterations used.
    pub iterations: u32,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Present value of a monthly payment stream; payment `k` (1-indexed)
/// discounts by `(1 + rate)^k`. Negative rates are treated as zero, in line
/// with the engine-wide rate normalization.
pub fn present_value(payments: &[Money], rate: Rate) -> Money {
    let reciprocal = Decimal::ONE / (Decimal::ONE + rate.max(Decimal::ZERO));
    let mut discount = Decimal::ONE;
    let mut pv = Decimal::ZERO;
    for payment in payments {
        discount *= reciprocal;
        pv += payment * discount;
    }
    pv
}

/// Solve for the monthly rate equating the stream's present value to
/// `target`.
///
/// Degenerate inputs (non-positive target, empty stream) solve to zero
/// rather than failing. Streams whose true rate exceeds 100% per month pin
/// against the top of the search bracket and come back just under 1.
pub fn solve_periodic_rate(target: Money, payments: &[Money]) -> Rate {
    bisect(target, payments).0
}

/// Rate solve with the full computation envelope, for callers that want the
/// annualized figure and solve diagnostics alongside the rate.
pub fn solve_rate(input: &RateSolveInput) -> ComputationOutput<RateSolveOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.target <= Decimal::ZERO {
        warnings.push("Target present value is not positive; rate solves to 0%".to_string());
    }
    if input.payments.is_empty() {
        warnings.push("Payment stream is empty; rate solves to 0%".to_string());
    }

    let (periodic_rate, iterations) = bisect(input.target, &input.payments);
    if periodic_rate > dec!(0.99) {
        warnings.push(
            "Solved rate pinned near the 100% monthly search bound; the true rate may be higher"
                .to_string(),
        );
    }

    let output = RateSolveOutput {
        periodic_rate,
        annual_rate_percent: periodic_rate * dec!(1200),
        present_value_at_rate: present_value(&input.payments, periodic_rate),
        iterations,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Actuarial-Method Effective Rate (Bisection)",
        input,
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Bisection
// ---------------------------------------------------------------------------

fn bisect(target: Money, payments: &[Money]) -> (Rate, u32) {
    if target <= Decimal::ZERO || payments.is_empty() {
        return (Decimal::ZERO, 0);
    }

    let mut lo = Decimal::ZERO;
    let mut hi = BRACKET_HI;

    for iteration in 1..=BISECTION_MAX_ITER {
        let mid = (lo + hi) / dec!(2);
        let pv = present_value(payments, mid);

        if (pv - target).abs() < PV_TOLERANCE {
            return (mid, iteration);
        }

        // PV falls as the rate rises: too much value means the rate is
        // still too low.
        if pv > target {
            lo = mid;
        } else {
            hi = mid;
        }

        if hi - lo < BRACKET_TOLERANCE {
            return (mid, iteration);
        }
    }

    ((lo + hi) / dec!(2), BISECTION_MAX_ITER)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    /// Schedule payments for 8000 at 6.5% over 12 months.
    fn level_stream() -> Vec<Money> {
        let mut payments = vec![dec!(690.37); 11];
        payments.push(dec!(690.39));
        payments
    }

    // -----------------------------------------------------------------------
    // 1. Present value at 0% is the plain sum
    // -----------------------------------------------------------------------
    #[test]
    fn test_present_value_at_zero_rate() {
        let pv = present_value(&[dec!(100), dec!(100), dec!(100)], Decimal::ZERO);
        assert_eq!(pv, dec!(300));
    }

    // -----------------------------------------------------------------------
    // 2. Present value discounts exactly
    // -----------------------------------------------------------------------
    #[test]
    fn test_present_value_discounts() {
        // 101 one month out at 1% per month is worth exactly 100 today.
        let pv = present_value(&[dec!(101)], dec!(0.01));
        assert_eq!(pv, dec!(100));
    }

    // -----------------------------------------------------------------------
    // 3. Clean level stream solves back to the nominal rate
    // -----------------------------------------------------------------------
    #[test]
    fn test_recovers_nominal_rate() {
        let rate = solve_periodic_rate(dec!(8000), &level_stream());
        assert_close(
            rate * dec!(1200),
            dec!(6.5),
            dec!(0.01),
            "Annualized solved rate",
        );
    }

    // -----------------------------------------------------------------------
    // 4. Lower target (prepaid charge withheld) raises the solved rate
    // -----------------------------------------------------------------------
    #[test]
    fn test_lower_target_raises_rate() {
        let at_full = solve_periodic_rate(dec!(8000), &level_stream());
        let at_net = solve_periodic_rate(dec!(7800), &level_stream());
        assert!(at_net > at_full);
        assert_close(
            at_net * dec!(1200),
            dec!(11.2733),
            dec!(0.05),
            "Annualized rate with 200 withheld",
        );
    }

    // -----------------------------------------------------------------------
    // 5. Single payment solves exactly
    // -----------------------------------------------------------------------
    #[test]
    fn test_single_payment_solve() {
        // 110 due in one month against 100 today is 10% per month.
        let rate = solve_periodic_rate(dec!(100), &[dec!(110)]);
        assert_close(rate, dec!(0.1), dec!(0.000001), "Single-payment rate");
    }

    // -----------------------------------------------------------------------
    // 6. Degenerate inputs solve to zero
    // -----------------------------------------------------------------------
    #[test]
    fn test_degenerate_inputs_solve_to_zero() {
        assert_eq!(solve_periodic_rate(Decimal::ZERO, &[dec!(100)]), Decimal::ZERO);
        assert_eq!(solve_periodic_rate(dec!(-50), &[dec!(100)]), Decimal::ZERO);
        assert_eq!(solve_periodic_rate(dec!(100), &[]), Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 7. Target above the undiscounted sum drives the rate to zero
    // -----------------------------------------------------------------------
    #[test]
    fn test_target_above_sum_solves_to_zero() {
        let rate = solve_periodic_rate(dec!(10000), &level_stream());
        assert!(
            rate < dec!(0.000001),
            "Rate should collapse to the lower bound, got {}",
            rate
        );
    }

    // -----------------------------------------------------------------------
    // 8. All-zero payment stream degrades to a zero rate
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_payments_solve_to_zero() {
        let rate = solve_periodic_rate(dec!(100), &[Decimal::ZERO; 6]);
        assert!(rate < dec!(0.000001), "got {}", rate);
    }

    // -----------------------------------------------------------------------
    // 9. Tiny target pins the rate near the top of the bracket
    // -----------------------------------------------------------------------
    #[test]
    fn test_tiny_target_pins_near_bracket_top() {
        let out = solve_rate(&RateSolveInput {
            target: dec!(0.01),
            payments: vec![dec!(1000); 12],
        });
        assert!(out.result.periodic_rate > dec!(0.99));
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("search bound")));
    }

    // -----------------------------------------------------------------------
    // 10. Envelope carries diagnostics
    // -----------------------------------------------------------------------
    #[test]
    fn test_solve_rate_envelope() {
        let out = solve_rate(&RateSolveInput {
            target: dec!(8000),
            payments: level_stream(),
        });
        assert_close(
            out.result.annual_rate_percent,
            dec!(6.5),
            dec!(0.01),
            "Annual rate in envelope",
        );
        assert!(out.result.iterations > 0);
        assert!(out.result.iterations < BISECTION_MAX_ITER);
        assert_close(
            out.result.present_value_at_rate,
            dec!(8000),
            dec!(0.01),
            "PV at solved rate",
        );
        assert!(out.methodology.contains("Bisection"));
        assert!(out.warnings.is_empty());
    }

    // -----------------------------------------------------------------------
    // 11. Degenerate solves warn instead of failing
    // -----------------------------------------------------------------------
    #[test]
    fn test_degenerate_solve_warns() {
        let out = solve_rate(&RateSolveInput {
            target: Decimal::ZERO,
            payments: vec![],
        });
        assert_eq!(out.result.periodic_rate, Decimal::ZERO);
        assert_eq!(out.result.iterations, 0);
        assert_eq!(out.warnings.len(), 2);
    }
}
