//! Due-date arithmetic for monthly payment schedules.
//!
//! Due dates advance by calendar months with the day-of-month clamped to the
//! end of shorter months (Jan 31 -> Feb 28/29). Each due date is computed
//! from the start date, not from the previous due date, so a clamp in one
//! month does not shift every later payment.

use chrono::{Months, NaiveDate, Utc};

/// Due date of the given 1-indexed payment period.
///
/// Period 1 falls on the start date itself; period `i` falls `i - 1`
/// calendar months later.
pub fn due_date(start: NaiveDate, period: u32) -> NaiveDate {
    start
        .checked_add_months(Months::new(period.saturating_sub(1)))
        .unwrap_or(start)
}

/// Calculation-date default when no start date is supplied.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
