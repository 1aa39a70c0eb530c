use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use crate::analytics::{self, AnalyticsSnapshot, PROFIT_FACTOR_CAP};
use crate::config::AnalysisConfig;
use crate::journal::calculations::{
    account_balance, account_total_pnl, determine_outcome, expected_net_pnl,
};
use crate::journal::{Account, ChecklistTemplate, Outcome, Strategy, Trade};
use crate::{types::*, JournalError, JournalResult};

#[cfg(feature = "insights")]
use crate::insights::{self, Insight, InsightSummary};
#[cfg(feature = "scoring")]
use crate::scoring::{self, TradeAnalysis};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A trade history on its own, for the metrics calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeHistoryInput {
    /// Chronological order is assumed for streaks
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub config: Option<AnalysisConfig>,
}

/// Everything the insight engine reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalInput {
    pub trades: Vec<Trade>,
    pub account: Account,
    #[serde(default)]
    pub strategies: Vec<Strategy>,
    /// Only the first template is consulted
    #[serde(default)]
    pub checklists: Vec<ChecklistTemplate>,
    #[serde(default)]
    pub config: Option<AnalysisConfig>,
}

#[cfg(feature = "insights")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalReport {
    pub analytics: AnalyticsSnapshot,
    /// Sorted by severity, high first
    pub insights: Vec<Insight>,
    pub summary: InsightSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeReviewInput {
    /// May be left out when the caller fills it in afterwards
    #[serde(default)]
    pub trade_id: String,
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub strategies: Vec<Strategy>,
    #[serde(default)]
    pub checklists: Vec<ChecklistTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountPnlInput {
    pub account: Account,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountPnl {
    pub account_id: String,
    pub total_pnl: Money,
    /// Starting balance plus `total_pnl`
    pub balance: Money,
    pub trade_count: u32,
}

// ---------------------------------------------------------------------------
// Record audit
// ---------------------------------------------------------------------------

/// Flag closed trades whose stored figures disagree with each other. The
/// trades are still used as given.
pub fn audit_records(trades: &[Trade], breakeven_threshold: Money) -> Vec<String> {
    let mut warnings = Vec::new();
    for trade in trades.iter().filter(|t| t.is_closed()) {
        let expected = expected_net_pnl(trade);
        if expected != trade.net_pnl {
            warn!(trade = %trade.id, net_pnl = %trade.net_pnl, %expected, "net P&L does not match gross minus costs");
            warnings.push(format!(
                "Trade {}: net P&L {} differs from gross P&L minus costs ({})",
                trade.id, trade.net_pnl, expected
            ));
        }

        if trade.outcome == Outcome::Pending {
            warnings.push(format!("Trade {}: closed with a pending outcome", trade.id));
            continue;
        }
        let implied = determine_outcome(trade.net_pnl, breakeven_threshold);
        if implied != trade.outcome {
            warn!(trade = %trade.id, recorded = ?trade.outcome, implied = ?implied, "outcome disagrees with net P&L");
            warnings.push(format!(
                "Trade {}: outcome {:?} disagrees with net P&L {} (implies {:?})",
                trade.id, trade.outcome, trade.net_pnl, implied
            ));
        }
    }
    warnings
}

fn resolve_config(config: &Option<AnalysisConfig>) -> JournalResult<AnalysisConfig> {
    let config = config.clone().unwrap_or_default();
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Metrics only.
pub fn analyze_history(
    input: &TradeHistoryInput,
) -> JournalResult<ComputationOutput<AnalyticsSnapshot>> {
    let start = Instant::now();
    let config = resolve_config(&input.config)?;
    let warnings = audit_records(&input.trades, config.breakeven_threshold);

    let snapshot = analytics::compute(&input.trades);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Trading Journal Analytics: closed-trade performance statistics",
        &serde_json::json!({
            "trades": input.trades.len(),
            "closed_trades": snapshot.closed_trades,
            "profit_factor_cap": PROFIT_FACTOR_CAP.to_string(),
            "order": "input order taken as chronological",
        }),
        warnings,
        elapsed,
        snapshot,
    ))
}

/// Metrics plus the full insight rule table.
#[cfg(feature = "insights")]
pub fn analyze_journal(input: &JournalInput) -> JournalResult<ComputationOutput<JournalReport>> {
    let start = Instant::now();
    let config = resolve_config(&input.config)?;
    let mut warnings = audit_records(&input.trades, config.breakeven_threshold);
    if input.checklists.len() > 1 {
        warnings.push(format!(
            "{} checklist templates supplied; only the first is consulted",
            input.checklists.len()
        ));
    }

    let snapshot = analytics::compute(&input.trades);
    let insights = insights::evaluate_with_config(
        &input.trades,
        &input.account,
        &input.strategies,
        &input.checklists,
        &snapshot,
        &config,
    );
    let summary = InsightSummary::from_insights(&insights);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Trading Journal Insights: threshold rules over closed-trade statistics",
        &serde_json::json!({
            "account_id": input.account.id,
            "closed_trades": snapshot.closed_trades,
            "breakeven_threshold": config.breakeven_threshold.to_string(),
            "recent_window": config.recent_window,
            "min_samples": config.min_samples,
            "profit_factor_cap": PROFIT_FACTOR_CAP.to_string(),
        }),
        warnings,
        elapsed,
        JournalReport {
            analytics: snapshot,
            insights,
            summary,
        },
    ))
}

/// Score the trade named by `trade_id`.
#[cfg(feature = "scoring")]
pub fn review_trade(input: &TradeReviewInput) -> JournalResult<ComputationOutput<TradeAnalysis>> {
    let start = Instant::now();
    if input.trade_id.is_empty() {
        return Err(JournalError::InvalidInput {
            field: "trade_id".into(),
            reason: "A trade id is required".into(),
        });
    }
    let trade = input
        .trades
        .iter()
        .find(|t| t.id == input.trade_id)
        .ok_or_else(|| JournalError::InvalidInput {
            field: "trade_id".into(),
            reason: format!("No trade with id '{}'", input.trade_id),
        })?;

    let mut warnings = Vec::new();
    if !trade.is_closed() {
        warnings.push(format!("Trade {} is not closed; outcome-based checks may not apply", trade.id));
    }
    let strategy_found = trade
        .strategy_id
        .as_deref()
        .map_or(true, |id| input.strategies.iter().any(|s| s.id == id));
    if !strategy_found {
        warnings.push(format!("Trade {}: strategy not found, strategy checks skipped", trade.id));
    }

    let analysis = scoring::analyze_trade(trade, &input.strategies, &input.checklists);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Per-Trade Review: baseline 50 with additive adjustments, clamped to 0-100",
        &serde_json::json!({
            "trade_id": trade.id,
            "strategy_id": trade.strategy_id,
            "checklist_id": ChecklistTemplate::active(&input.checklists).map(|c| c.id.as_str()),
        }),
        warnings,
        elapsed,
        analysis,
    ))
}

/// Net P&L total and balance for one account.
pub fn account_pnl(input: &AccountPnlInput) -> JournalResult<ComputationOutput<AccountPnl>> {
    let start = Instant::now();
    let account = &input.account;
    if account.id.is_empty() {
        return Err(JournalError::InvalidInput {
            field: "account.id".into(),
            reason: "Account id is required".into(),
        });
    }

    let mut warnings = Vec::new();
    let starting = match account.initial_balance {
        Some(initial) => initial,
        None => {
            warnings.push("No initial_balance given; using the stored balance as the start".into());
            account.balance
        }
    };
    let total_pnl = account_total_pnl(&account.id, &input.trades);
    let balance = account_balance(starting, &account.id, &input.trades);
    let trade_count = input
        .trades
        .iter()
        .filter(|t| t.account_id == account.id)
        .count() as u32;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Account P&L: starting balance plus the sum of net trade P&L",
        &serde_json::json!({ "pnl_basis": "net" }),
        warnings,
        elapsed,
        AccountPnl {
            account_id: account.id.clone(),
            total_pnl,
            balance,
            trade_count,
        },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
