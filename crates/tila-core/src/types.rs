use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::rounding::round_cents;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.005416… = 6.5% annual / 12). Fields named
/// `*_percent` are the exception and carry the human-facing percentage.
pub type Rate = Decimal;

/// Whether the note carries a prepayment penalty clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrepayPenalty {
    #[default]
    None,
    Penalty,
}

/// The terms of a consumer installment loan.
///
/// Every field is optional on the wire; missing or malformed values
/// normalize (zero amounts, one-month minimum term, today's date) rather
/// than rejecting the request, so a partially filled form still produces a
/// well-defined schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTerms {
    /// Borrower name, echoed onto the disclosure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Project or property address, echoed onto the disclosure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_address: Option<String>,
    /// First payment date. Defaults to the calculation date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Contract amount before down payment.
    pub principal_amount: Money,
    /// Down payment (reduces the financed base).
    pub down_payment: Money,
    /// Financed fees that are not finance charges (e.g. permit fees).
    pub other_financed_fees: Money,
    /// Prepaid finance charge: paid at closing, excluded from the amount
    /// financed but included in the finance charge.
    pub prepaid_finance_charge: Money,
    /// Nominal annual rate as a percentage (6.5 = 6.5%).
    pub nominal_annual_rate_percent: Rate,
    /// Term in months.
    pub term_months: u32,
    /// Flat late fee charged after the grace period.
    pub late_fee_amount: Money,
    /// Days past due before the late fee applies.
    pub grace_days: u32,
    /// Prepayment penalty clause.
    pub prepay_penalty: PrepayPenalty,
    /// Security interest description, echoed verbatim onto the disclosure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_interest_text: Option<String>,
}

impl LoanTerms {
    /// Financed base: principal less down payment plus financed fees,
    /// rounded to the cent and clamped at zero.
    pub fn principal_financed_base(&self) -> Money {
        round_cents(self.principal_amount - self.down_payment + self.other_financed_fees)
            .max(Decimal::ZERO)
    }

    /// Regulation Z amount financed: the financed base less the prepaid
    /// finance charge, clamped at zero.
    pub fn amount_financed(&self) -> Money {
        round_cents(self.principal_financed_base() - self.prepaid_finance_charge)
            .max(Decimal::ZERO)
    }

    /// Monthly periodic rate from the nominal annual percentage. Negative
    /// rates are treated as zero.
    pub fn periodic_rate(&self) -> Rate {
        self.nominal_annual_rate_percent.max(Decimal::ZERO) / dec!(1200)
    }

    /// Number of monthly payment periods, never less than one.
    pub fn term_periods(&self) -> u32 {
        self.term_months.max(1)
    }

    /// First payment date, defaulting to the calculation date.
    pub fn start_or_today(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(dates::today_utc)
    }

    /// Notices for inputs that were normalized instead of rejected.
    pub(crate) fn normalization_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.nominal_annual_rate_percent < Decimal::ZERO {
            warnings.push(format!(
                "Nominal annual rate {}% is negative; treated as 0%",
                self.nominal_annual_rate_percent
            ));
        }
        if self.term_months == 0 {
            warnings.push("Term of 0 months treated as a single payment period".to_string());
        }
        if self.principal_amount - self.down_payment + self.other_financed_fees < Decimal::ZERO {
            warnings.push(
                "Down payment exceeds principal plus financed fees; financed base clamped to zero"
                    .to_string(),
            );
        }
        warnings
    }
}

/// Standard computation output envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financed_base_clamps_at_zero() {
        let terms = LoanTerms {
            principal_amount: dec!(1000),
            down_payment: dec!(2500),
            ..LoanTerms::default()
        };
        assert_eq!(terms.principal_financed_base(), Decimal::ZERO);
    }

    #[test]
    fn test_amount_financed_excludes_prepaid_charge() {
        let terms = LoanTerms {
            principal_amount: dec!(8000),
            prepaid_finance_charge: dec!(200),
            ..LoanTerms::default()
        };
        assert_eq!(terms.principal_financed_base(), dec!(8000));
        assert_eq!(terms.amount_financed(), dec!(7800));
    }

    #[test]
    fn test_amount_financed_clamps_when_charge_exceeds_base() {
        let terms = LoanTerms {
            principal_amount: dec!(100),
            prepaid_finance_charge: dec!(500),
            ..LoanTerms::default()
        };
        assert_eq!(terms.amount_financed(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_rate_treated_as_zero() {
        let terms = LoanTerms {
            nominal_annual_rate_percent: dec!(-4),
            ..LoanTerms::default()
        };
        assert_eq!(terms.periodic_rate(), Decimal::ZERO);
        assert!(!terms.normalization_warnings().is_empty());
    }

    #[test]
    fn test_zero_term_floors_to_one_period() {
        let terms = LoanTerms::default();
        assert_eq!(terms.term_periods(), 1);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let terms: LoanTerms = serde_json::from_str(r#"{"principal_amount": "5000"}"#).unwrap();
        assert_eq!(terms.principal_amount, dec!(5000));
        assert_eq!(terms.down_payment, Decimal::ZERO);
        assert_eq!(terms.term_months, 0);
        assert_eq!(terms.prepay_penalty, PrepayPenalty::None);
        assert!(terms.start_date.is_none());
    }
}
