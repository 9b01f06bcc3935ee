use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let terms: tila_core::LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tila_core::schedule::build_schedule(&terms);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn solve_rate(input_json: String) -> NapiResult<String> {
    let input: tila_core::solver::RateSolveInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tila_core::solver::solve_rate(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Disclosure
// ---------------------------------------------------------------------------

#[napi]
pub fn run_disclosure(input_json: String) -> NapiResult<String> {
    let terms: tila_core::LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tila_core::disclosure::run_disclosure(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Share links
// ---------------------------------------------------------------------------

#[napi]
pub fn to_share_query(input_json: String) -> NapiResult<String> {
    let terms: tila_core::LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    Ok(tila_core::link::to_share_query(&terms))
}

#[napi]
pub fn parse_share_query(query: String) -> NapiResult<String> {
    let terms = tila_core::link::parse_share_query(&query).map_err(to_napi_error)?;
    serde_json::to_string(&terms).map_err(to_napi_error)
}
