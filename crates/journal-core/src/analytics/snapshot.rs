use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::journal::{MarketCondition, TimeOfDay};
use crate::types::*;

/// Returned as the profit factor when there are winning trades but no losing
/// ones. The ratio is undefined there; it is capped rather than infinite so
/// that it survives Decimal arithmetic and JSON.
pub const PROFIT_FACTOR_CAP: Rate = Decimal::from_parts(999, 0, 0, false, 0);

/// Count and win rate for one key of a breakdown map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub trades: u32,
    pub wins: u32,
    pub win_rate: Percent,
    pub net_pnl: Money,
}

/// Net P&L summed over one calendar period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPnl {
    /// `YYYY-MM-DD`, `YYYY-Www` (ISO week) or `YYYY-MM`
    pub period: String,
    pub pnl: Money,
    pub trades: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurvePoint {
    pub date: NaiveDate,
    pub daily_pnl: Money,
    pub cumulative_pnl: Money,
    pub drawdown: Money,
}

/// Identity and result of the best or worst closed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRef {
    pub id: String,
    pub symbol: String,
    pub net_pnl: Money,
}

/// Every statistic derived from one trade history.
///
/// Recomputed on every call; nothing here is cached or persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    // Counts
    pub total_trades: u32,
    pub closed_trades: u32,
    pub open_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub breakeven_trades: u32,

    // Profitability
    pub total_pnl: Money,
    pub gross_profit: Money,
    /// Stored as a positive number
    pub gross_loss: Money,
    pub total_costs: Money,
    pub win_rate: Percent,
    pub profit_factor: Rate,
    pub expectancy: Money,
    pub average_win: Money,
    /// Stored as a positive number
    pub average_loss: Money,
    pub win_loss_ratio: Rate,
    pub largest_win: Money,
    pub largest_loss: Money,
    pub avg_rr: Rate,
    pub best_trade: Option<TradeRef>,
    pub worst_trade: Option<TradeRef>,

    // Breakdowns
    pub by_symbol: BTreeMap<String, BreakdownEntry>,
    pub by_strategy: BTreeMap<String, BreakdownEntry>,
    pub by_time_of_day: BTreeMap<TimeOfDay, BreakdownEntry>,
    pub by_market_condition: BTreeMap<MarketCondition, BreakdownEntry>,

    // Periods
    pub pnl_by_day: Vec<PeriodPnl>,
    pub pnl_by_week: Vec<PeriodPnl>,
    pub pnl_by_month: Vec<PeriodPnl>,

    // Streaks
    pub max_consecutive_wins: u32,
    pub max_consecutive_losses: u32,
    /// Positive for a running win streak, negative for a losing one
    pub current_streak: i32,

    // Risk
    pub max_drawdown: Money,
    pub max_drawdown_pct: Percent,
    pub recovery_factor: Rate,
    pub sharpe_ratio: Rate,
    pub avg_hold_time_hours: Decimal,
    pub equity_curve: Vec<EquityCurvePoint>,
}
