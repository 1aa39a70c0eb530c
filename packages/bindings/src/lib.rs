use napi::Result as NapiResult;
use napi_derive::napi;

use journal_core::report;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_analytics(input_json: String) -> NapiResult<String> {
    let input: report::TradeHistoryInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = report::analyze_history(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_insights(input_json: String) -> NapiResult<String> {
    let input: report::JournalInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = report::analyze_journal(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Trade review
// ---------------------------------------------------------------------------

#[napi]
pub fn review_trade(input_json: String) -> NapiResult<String> {
    let input: report::TradeReviewInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = report::review_trade(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[napi]
pub fn account_pnl(input_json: String) -> NapiResult<String> {
    let input: report::AccountPnlInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = report::account_pnl(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
