use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use super::snapshot::*;
use super::stats::{mean, population_stdev};
use crate::journal::{Outcome, Trade};
use crate::types::*;

/// Compute the analytics snapshot for a trade history.
///
/// Precondition: `trades` is in chronological order. Streaks are walked in
/// the order given, so an unsorted history yields wrong (but never
/// panicking) streak figures. Day, week and month buckets are keyed by exit
/// date and are order independent.
///
/// Only `closed` trades enter rates, ratios, streaks and period buckets.
/// Closed trades without an exit date are left out of the period buckets,
/// the drawdown series and the hold-time average.
pub fn compute(trades: &[Trade]) -> AnalyticsSnapshot {
    let mut snapshot = AnalyticsSnapshot {
        total_trades: trades.len() as u32,
        ..AnalyticsSnapshot::default()
    };

    let closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
    snapshot.closed_trades = closed.len() as u32;
    snapshot.open_trades = snapshot.total_trades - snapshot.closed_trades;

    if closed.is_empty() {
        return snapshot;
    }

    profitability(&closed, &mut snapshot);
    breakdowns(&closed, &mut snapshot);
    streaks(&closed, &mut snapshot);
    periods_and_drawdown(&closed, &mut snapshot);
    hold_time(&closed, &mut snapshot);

    debug!(
        closed = snapshot.closed_trades,
        win_rate = %snapshot.win_rate,
        total_pnl = %snapshot.total_pnl,
        max_drawdown = %snapshot.max_drawdown,
        "computed analytics snapshot"
    );

    snapshot
}

// ---------------------------------------------------------------------------
// Profitability
// ---------------------------------------------------------------------------

fn profitability(closed: &[&Trade], s: &mut AnalyticsSnapshot) {
    let n = closed.len();
    let mut winners = 0usize;
    let mut losers = 0usize;

    for trade in closed {
        s.total_pnl += trade.net_pnl;
        s.total_costs += trade.total_costs();
        match trade.outcome {
            Outcome::Win => {
                winners += 1;
                s.gross_profit += trade.net_pnl;
            }
            Outcome::Loss => {
                losers += 1;
                s.gross_loss += trade.net_pnl;
            }
            Outcome::Breakeven => s.breakeven_trades += 1,
            Outcome::Pending => {}
        }
    }
    s.gross_loss = s.gross_loss.abs();
    s.winning_trades = winners as u32;
    s.losing_trades = losers as u32;

    s.win_rate = percent_of(winners, n);
    s.profit_factor = if s.gross_loss > Decimal::ZERO {
        s.gross_profit / s.gross_loss
    } else if s.gross_profit > Decimal::ZERO {
        PROFIT_FACTOR_CAP
    } else {
        Decimal::ZERO
    };
    s.expectancy = s.total_pnl / Decimal::from(n as u64);

    if winners > 0 {
        s.average_win = s.gross_profit / Decimal::from(winners as u64);
    }
    if losers > 0 {
        s.average_loss = s.gross_loss / Decimal::from(losers as u64);
    }
    s.win_loss_ratio = ratio_or_zero(s.average_win, s.average_loss);

    s.largest_win = closed
        .iter()
        .filter(|t| t.is_win())
        .map(|t| t.net_pnl)
        .max()
        .unwrap_or(Decimal::ZERO);
    s.largest_loss = closed
        .iter()
        .filter(|t| t.is_loss())
        .map(|t| t.net_pnl.abs())
        .max()
        .unwrap_or(Decimal::ZERO);

    let rrs: Vec<Decimal> = closed.iter().map(|t| t.actual_rr).collect();
    s.avg_rr = mean(&rrs);

    // First occurrence wins ties so repeated calls pick the same record.
    let mut best: Option<&Trade> = None;
    let mut worst: Option<&Trade> = None;
    for &trade in closed {
        if best.map_or(true, |b| trade.net_pnl > b.net_pnl) {
            best = Some(trade);
        }
        if worst.map_or(true, |w| trade.net_pnl < w.net_pnl) {
            worst = Some(trade);
        }
    }
    s.best_trade = best.map(trade_ref);
    s.worst_trade = worst.map(trade_ref);
}

fn trade_ref(trade: &Trade) -> TradeRef {
    TradeRef {
        id: trade.id.clone(),
        symbol: trade.symbol.clone(),
        net_pnl: trade.net_pnl,
    }
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

fn tally<K: Ord>(map: &mut BTreeMap<K, BreakdownEntry>, key: K, trade: &Trade) {
    let entry = map.entry(key).or_default();
    entry.trades += 1;
    if trade.is_win() {
        entry.wins += 1;
    }
    entry.net_pnl += trade.net_pnl;
}

fn finish<K>(map: &mut BTreeMap<K, BreakdownEntry>) {
    for entry in map.values_mut() {
        entry.win_rate = percent_of(entry.wins as usize, entry.trades as usize);
    }
}

fn breakdowns(closed: &[&Trade], s: &mut AnalyticsSnapshot) {
    for &trade in closed {
        tally(&mut s.by_symbol, trade.symbol.clone(), trade);
        if let Some(strategy_id) = &trade.strategy_id {
            tally(&mut s.by_strategy, strategy_id.clone(), trade);
        }
        if let Some(time) = trade.time_of_day {
            tally(&mut s.by_time_of_day, time, trade);
        }
        if let Some(condition) = trade.market_condition {
            tally(&mut s.by_market_condition, condition, trade);
        }
    }
    finish(&mut s.by_symbol);
    finish(&mut s.by_strategy);
    finish(&mut s.by_time_of_day);
    finish(&mut s.by_market_condition);
}

// ---------------------------------------------------------------------------
// Streaks
// ---------------------------------------------------------------------------

/// Signed run counter: +n for n wins in a row, -n for n losses in a row.
/// A change of outcome resets it to ±1 and a breakeven resets it to 0.
fn streaks(closed: &[&Trade], s: &mut AnalyticsSnapshot) {
    let mut current: i32 = 0;
    let mut max_wins: i32 = 0;
    let mut max_losses: i32 = 0;

    for trade in closed {
        match trade.outcome {
            Outcome::Win => {
                current = if current > 0 { current + 1 } else { 1 };
                max_wins = max_wins.max(current);
            }
            Outcome::Loss => {
                current = if current < 0 { current - 1 } else { -1 };
                max_losses = max_losses.max(-current);
            }
            Outcome::Breakeven | Outcome::Pending => current = 0,
        }
    }

    s.max_consecutive_wins = max_wins as u32;
    s.max_consecutive_losses = max_losses as u32;
    s.current_streak = current;
}

// ---------------------------------------------------------------------------
// Periods, equity curve and drawdown
// ---------------------------------------------------------------------------

fn bucket(map: &mut BTreeMap<String, (Money, u32)>, key: String, pnl: Money) {
    let slot = map.entry(key).or_insert((Decimal::ZERO, 0));
    slot.0 += pnl;
    slot.1 += 1;
}

fn into_periods(map: BTreeMap<String, (Money, u32)>) -> Vec<PeriodPnl> {
    map.into_iter()
        .map(|(period, (pnl, trades))| PeriodPnl {
            period,
            pnl,
            trades,
        })
        .collect()
}

fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{:04}-W{:02}", week.year(), week.week())
}

fn periods_and_drawdown(closed: &[&Trade], s: &mut AnalyticsSnapshot) {
    let mut by_date: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    let mut weeks = BTreeMap::new();
    let mut months = BTreeMap::new();
    let mut days = BTreeMap::new();

    for trade in closed {
        let Some(exit) = trade.exit_date else {
            continue;
        };
        let date = exit.date_naive();
        *by_date.entry(date).or_insert(Decimal::ZERO) += trade.net_pnl;
        bucket(&mut days, date.format("%Y-%m-%d").to_string(), trade.net_pnl);
        bucket(&mut weeks, week_key(date), trade.net_pnl);
        bucket(
            &mut months,
            format!("{:04}-{:02}", date.year(), date.month()),
            trade.net_pnl,
        );
    }

    s.pnl_by_day = into_periods(days);
    s.pnl_by_week = into_periods(weeks);
    s.pnl_by_month = into_periods(months);

    // Equity starts flat at zero, so an opening loss is already a drawdown.
    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;
    let mut max_dd_pct = Decimal::ZERO;
    let mut curve = Vec::with_capacity(by_date.len());

    for (&date, &daily_pnl) in &by_date {
        cumulative += daily_pnl;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = peak - cumulative;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
        if peak > Decimal::ZERO {
            let pct = drawdown / peak * Decimal::ONE_HUNDRED;
            if pct > max_dd_pct {
                max_dd_pct = pct;
            }
        }
        curve.push(EquityCurvePoint {
            date,
            daily_pnl,
            cumulative_pnl: cumulative,
            drawdown,
        });
    }

    s.max_drawdown = max_dd;
    s.max_drawdown_pct = max_dd_pct;
    s.recovery_factor = ratio_or_zero(s.total_pnl, max_dd);
    s.equity_curve = curve;

    // Sharpe-like ratio over daily P&L: mean / population sd, no annualisation.
    let daily: Vec<Decimal> = by_date.values().copied().collect();
    let sd = population_stdev(&daily);
    s.sharpe_ratio = if sd > Decimal::ZERO {
        mean(&daily) / sd
    } else {
        Decimal::ZERO
    };
}

// ---------------------------------------------------------------------------
// Hold time
// ---------------------------------------------------------------------------

fn hold_time(closed: &[&Trade], s: &mut AnalyticsSnapshot) {
    let hours: Vec<Decimal> = closed
        .iter()
        .filter_map(|t| t.exit_date.map(|exit| (exit - t.entry_date).num_seconds()))
        .map(|secs| Decimal::from(secs) / Decimal::from(3600))
        .collect();
    s.avg_hold_time_hours = mean(&hours);
}

/// Cumulative series drawdown, exposed for callers that already hold an
/// equity series rather than trades.
pub fn max_drawdown(cumulative_pnl: &[Money]) -> Money {
    let mut peak = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;
    for &value in cumulative_pnl {
        if value > peak {
            peak = value;
        }
        let drawdown = peak - value;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }
    max_dd
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
