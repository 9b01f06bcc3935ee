//! Cent rounding as applied throughout the engine.
//!
//! Every monetary figure is rounded to the cent at the point it is produced
//! (payment, per-period interest, principal, running balance, totals), so
//! schedules replay exactly the amounts a borrower would see on a statement.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places, half-cents away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
