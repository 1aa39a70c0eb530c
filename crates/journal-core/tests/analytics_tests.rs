mod common;

use common::{closed, open, series};
use journal_core::analytics::{self, AnalyticsSnapshot, PROFIT_FACTOR_CAP};
use journal_core::journal::TimeOfDay;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[test]
fn test_empty_history_is_all_zero() {
    let s = analytics::compute(&[]);
    assert_eq!(s, AnalyticsSnapshot::default());
    assert_eq!(s.win_rate, Decimal::ZERO);
    assert_eq!(s.profit_factor, Decimal::ZERO);
    assert!(s.best_trade.is_none());
    assert!(s.worst_trade.is_none());
}

#[test]
fn test_single_winner() {
    let s = analytics::compute(&series(&[dec!(250)]));
    assert_eq!(s.win_rate, dec!(100));
    assert_eq!(s.profit_factor, PROFIT_FACTOR_CAP);
    assert_eq!(s.max_drawdown, Decimal::ZERO);
    assert_eq!(s.win_loss_ratio, Decimal::ZERO);
    assert_eq!(s.sharpe_ratio, Decimal::ZERO);
    assert_eq!(s.best_trade.as_ref().map(|t| t.id.as_str()), Some("t0"));
}

#[test]
fn test_tiny_loss_lifts_profit_factor_past_cap() {
    let s = analytics::compute(&series(&[dec!(5000), dec!(-1)]));
    assert_eq!(s.profit_factor, dec!(5000));
    assert!(s.profit_factor > PROFIT_FACTOR_CAP);
}

#[test]
fn test_only_breakevens_has_zero_profit_factor() {
    let s = analytics::compute(&series(&[Decimal::ZERO, Decimal::ZERO]));
    assert_eq!(s.profit_factor, Decimal::ZERO);
    assert_eq!(s.breakeven_trades, 2);
    assert_eq!(s.current_streak, 0);
}

#[test]
fn test_open_trades_excluded() {
    let mut trades = series(&[dec!(100), dec!(-50)]);
    trades.push(open("o1", 5));
    let s = analytics::compute(&trades);
    assert_eq!(s.total_trades, 3);
    assert_eq!(s.closed_trades, 2);
    assert_eq!(s.open_trades, 1);
    assert_eq!(s.win_rate, dec!(50));
}

// ---------------------------------------------------------------------------
// Profitability
// ---------------------------------------------------------------------------

#[test]
fn test_twenty_five_trade_scenario() {
    let nets: Vec<Decimal> = (0..25)
        .map(|i| if i % 5 == 2 || i % 5 == 4 { dec!(-50) } else { dec!(100) })
        .collect();
    let s = analytics::compute(&series(&nets));
    assert_eq!(s.winning_trades, 15);
    assert_eq!(s.losing_trades, 10);
    assert_eq!(s.win_rate, dec!(60));
    assert_eq!(s.profit_factor, dec!(3));
    assert_eq!(s.expectancy, dec!(40));
    assert_eq!(s.average_win, dec!(100));
    assert_eq!(s.average_loss, dec!(50));
    assert_eq!(s.win_loss_ratio, dec!(2));
    assert_eq!(s.total_pnl, dec!(1000));
}

#[test]
fn test_best_and_worst_keep_first_on_ties() {
    let s = analytics::compute(&series(&[dec!(80), dec!(-30), dec!(80), dec!(-30)]));
    assert_eq!(s.best_trade.unwrap().id, "t0");
    assert_eq!(s.worst_trade.unwrap().id, "t1");
    assert_eq!(s.largest_win, dec!(80));
    assert_eq!(s.largest_loss, dec!(30));
}

// ---------------------------------------------------------------------------
// Streaks
// ---------------------------------------------------------------------------

#[test]
fn test_streaks_with_breakeven_reset() {
    // W W L W W W BE L L
    let s = analytics::compute(&series(&[
        dec!(10),
        dec!(10),
        dec!(-10),
        dec!(10),
        dec!(10),
        dec!(10),
        dec!(0),
        dec!(-10),
        dec!(-10),
    ]));
    assert_eq!(s.max_consecutive_wins, 3);
    assert_eq!(s.max_consecutive_losses, 2);
    assert_eq!(s.current_streak, -2);
}

#[test]
fn test_streaks_follow_input_order() {
    // Chronologically W L W L W L; supplied with the wins first.
    let chronological = series(&[
        dec!(10),
        dec!(-10),
        dec!(10),
        dec!(-10),
        dec!(10),
        dec!(-10),
    ]);
    let mut shuffled: Vec<_> = chronological.iter().filter(|t| t.is_win()).cloned().collect();
    shuffled.extend(chronological.iter().filter(|t| t.is_loss()).cloned());

    let sorted = analytics::compute(&chronological);
    let unsorted = analytics::compute(&shuffled);

    assert_eq!(sorted.max_consecutive_wins, 1);
    assert_eq!(sorted.max_consecutive_losses, 1);
    assert_eq!(unsorted.max_consecutive_wins, 3);
    assert_eq!(unsorted.max_consecutive_losses, 3);
    // Date-keyed figures do not depend on the order given.
    assert_eq!(sorted.max_drawdown, unsorted.max_drawdown);
    assert_eq!(sorted.pnl_by_day, unsorted.pnl_by_day);
}

// ---------------------------------------------------------------------------
// Drawdown and periods
// ---------------------------------------------------------------------------

#[test]
fn test_drawdown_over_daily_equity() {
    // cumulative 100, 150, 80, 120
    let s = analytics::compute(&series(&[dec!(100), dec!(50), dec!(-70), dec!(40)]));
    assert_eq!(s.max_drawdown, dec!(70));
    assert_eq!(s.recovery_factor, dec!(120) / dec!(70));
    assert_eq!(s.max_drawdown_pct.round_dp(2), dec!(46.67));
    let cumulative: Vec<Decimal> = s.equity_curve.iter().map(|p| p.cumulative_pnl).collect();
    assert_eq!(cumulative, vec![dec!(100), dec!(150), dec!(80), dec!(120)]);
}

#[test]
fn test_opening_loss_counts_as_drawdown() {
    let s = analytics::compute(&series(&[dec!(-40), dec!(100)]));
    assert_eq!(s.max_drawdown, dec!(40));
}

#[test]
fn test_same_day_trades_share_one_bucket() {
    let trades = vec![
        closed("a", 0, dec!(30)),
        closed("b", 0, dec!(-10)),
        closed("c", 1, dec!(5)),
    ];
    let s = analytics::compute(&trades);
    assert_eq!(s.pnl_by_day.len(), 2);
    assert_eq!(s.pnl_by_day[0].period, "2024-01-02");
    assert_eq!(s.pnl_by_day[0].pnl, dec!(20));
    assert_eq!(s.pnl_by_day[0].trades, 2);
    assert_eq!(s.pnl_by_month.len(), 1);
    assert_eq!(s.pnl_by_month[0].period, "2024-01");
}

#[test]
fn test_missing_exit_date_skips_period_buckets_only() {
    let mut trades = series(&[dec!(30), dec!(20)]);
    trades[1].exit_date = None;
    let s = analytics::compute(&trades);
    assert_eq!(s.closed_trades, 2);
    assert_eq!(s.total_pnl, dec!(50));
    assert_eq!(s.pnl_by_day.len(), 1);
    assert_eq!(s.avg_hold_time_hours, dec!(2));
}

#[test]
fn test_sharpe_like_ratio() {
    // daily 10, 30 -> mean 20, population sd 10
    let s = analytics::compute(&series(&[dec!(10), dec!(30)]));
    assert_eq!(s.sharpe_ratio.round_dp(10), dec!(2));
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

#[test]
fn test_breakdowns_have_no_zero_filled_keys() {
    let mut trades = series(&[dec!(10), dec!(-10), dec!(10)]);
    trades[0].time_of_day = Some(TimeOfDay::Morning);
    trades[1].time_of_day = Some(TimeOfDay::Morning);
    trades[2].strategy_id = Some("orb".into());
    let s = analytics::compute(&trades);

    assert_eq!(s.by_time_of_day.len(), 1);
    let morning = &s.by_time_of_day[&TimeOfDay::Morning];
    assert_eq!(morning.trades, 2);
    assert_eq!(morning.win_rate, dec!(50));
    assert!(s.by_market_condition.is_empty());
    assert_eq!(s.by_strategy.len(), 1);
    assert_eq!(s.by_symbol["NQ"].trades, 3);
}

#[test]
fn test_compute_is_idempotent() {
    let trades = series(&[dec!(10), dec!(-25), dec!(40), dec!(0), dec!(-5)]);
    assert_eq!(analytics::compute(&trades), analytics::compute(&trades));
}
