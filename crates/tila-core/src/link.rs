//! Shareable-link codec for loan terms.
//!
//! Serializes `LoanTerms` to a compact URL query string and back, using
//! short keys (`amount`, `down`, `pfc`, `apr`, ...) so a filled-in quote can
//! travel as a link. Parsing is lenient the way the engine is lenient:
//! unknown keys are ignored, unparseable numbers coerce to zero, bad dates
//! drop to the default. Only a structurally broken query (malformed
//! percent-escape, non-UTF-8 data) is an error.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::TilaError;
use crate::types::{LoanTerms, Money, PrepayPenalty};
use crate::TilaResult;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode terms as a form-urlencoded query string (no leading `?`).
///
/// Numeric fields are always present; text fields and the start date are
/// omitted when blank, so parsing the result reproduces the same terms.
pub fn to_share_query(terms: &LoanTerms) -> String {
    let mut query = String::new();

    push_text(&mut query, "name", terms.customer_name.as_deref());
    push_text(&mut query, "addr", terms.project_address.as_deref());
    if let Some(start) = terms.start_date {
        push_pair(&mut query, "start", &start.to_string());
    }
    push_pair(&mut query, "amount", &terms.principal_amount.to_string());
    push_pair(&mut query, "down", &terms.down_payment.to_string());
    push_pair(&mut query, "other", &terms.other_financed_fees.to_string());
    push_pair(&mut query, "pfc", &terms.prepaid_finance_charge.to_string());
    push_pair(
        &mut query,
        "apr",
        &terms.nominal_annual_rate_percent.to_string(),
    );
    push_pair(&mut query, "term", &terms.term_months.to_string());
    push_pair(&mut query, "late", &terms.late_fee_amount.to_string());
    push_pair(&mut query, "grace", &terms.grace_days.to_string());
    push_pair(
        &mut query,
        "prepay",
        match terms.prepay_penalty {
            PrepayPenalty::Penalty => "penalty",
            PrepayPenalty::None => "none",
        },
    );
    push_text(&mut query, "sec", terms.security_interest_text.as_deref());

    query
}

fn push_text(query: &mut String, key: &str, value: Option<&str>) {
    if let Some(text) = value {
        if !text.is_empty() {
            push_pair(query, key, text);
        }
    }
}

fn push_pair(query: &mut String, key: &str, value: &str) {
    if !query.is_empty() {
        query.push('&');
    }
    query.push_str(key); // keys are plain ASCII
    query.push('=');
    encode_component(query, value);
}

/// Form-urlencoding: unreserved bytes pass through, space becomes `+`,
/// everything else percent-escapes.
fn encode_component(out: &mut String, value: &str) {
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            other => {
                out.push('%');
                out.push(HEX_UPPER[(other >> 4) as usize] as char);
                out.push(HEX_UPPER[(other & 0x0F) as usize] as char);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a query string (with or without a leading `?`) into loan terms.
///
/// Recognized keys overlay the defaults; later duplicates win. Values that
/// fail to parse normalize instead of erroring: numbers to zero, dates to
/// absent.
pub fn parse_share_query(query: &str) -> TilaResult<LoanTerms> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut terms = LoanTerms::default();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(raw_key)?;
        let value = decode_component(raw_value)?;
        apply_param(&mut terms, &key, &value);
    }

    Ok(terms)
}

fn apply_param(terms: &mut LoanTerms, key: &str, value: &str) {
    match key {
        "name" => terms.customer_name = non_empty(value),
        "addr" => terms.project_address = non_empty(value),
        "start" => terms.start_date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
        "amount" => terms.principal_amount = parse_money(value),
        "down" => terms.down_payment = parse_money(value),
        "other" => terms.other_financed_fees = parse_money(value),
        "pfc" => terms.prepaid_finance_charge = parse_money(value),
        "apr" => terms.nominal_annual_rate_percent = parse_money(value),
        "term" => terms.term_months = parse_count(value),
        "late" => terms.late_fee_amount = parse_money(value),
        "grace" => terms.grace_days = parse_count(value),
        "prepay" => {
            terms.prepay_penalty = if value == "penalty" {
                PrepayPenalty::Penalty
            } else {
                PrepayPenalty::None
            }
        }
        "sec" => terms.security_interest_text = non_empty(value),
        _ => {} // Unknown keys are ignored.
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_money(value: &str) -> Money {
    value.trim().parse().unwrap_or(Decimal::ZERO)
}

/// Whole-month/day counts: fractional values floor, negatives clamp to 0.
fn parse_count(value: &str) -> u32 {
    let parsed: Decimal = value.trim().parse().unwrap_or(Decimal::ZERO);
    parsed
        .floor()
        .max(Decimal::ZERO)
        .min(Decimal::from(u32::MAX))
        .to_u32()
        .unwrap_or(0)
}

fn decode_component(input: &str) -> TilaResult<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hi = bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16));
                let lo = bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi * 16 + lo) as u8);
                        i += 3;
                    }
                    _ => {
                        return Err(TilaError::InvalidQuery(format!(
                            "Malformed percent-escape in '{input}'"
                        )))
                    }
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8(out)
        .map_err(|_| TilaError::InvalidQuery(format!("'{input}' does not decode to UTF-8")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
