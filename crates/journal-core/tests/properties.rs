mod common;

use journal_core::analytics;
use journal_core::insights;
use journal_core::journal::{Emotion, Trade};
use journal_core::scoring::score_trade;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Net P&L in cents between -5000.00 and 5000.00.
fn nets() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(-500_000i64..=500_000, 0..60)
        .prop_map(|cents| cents.into_iter().map(|c| Decimal::new(c, 2)).collect())
}

fn history() -> impl Strategy<Value = Vec<Trade>> {
    nets().prop_map(|n| common::series(&n))
}

proptest! {
    #[test]
    fn compute_is_deterministic(trades in history()) {
        prop_assert_eq!(analytics::compute(&trades), analytics::compute(&trades));
    }

    #[test]
    fn streaks_are_bounded(trades in history()) {
        let s = analytics::compute(&trades);
        prop_assert!(s.max_consecutive_wins <= s.winning_trades);
        prop_assert!(s.max_consecutive_losses <= s.losing_trades);
        prop_assert!(s.current_streak.unsigned_abs() <= s.closed_trades);
        prop_assert_eq!(
            s.winning_trades + s.losing_trades + s.breakeven_trades,
            s.closed_trades
        );
    }

    #[test]
    fn drawdown_is_non_negative(trades in history()) {
        let s = analytics::compute(&trades);
        prop_assert!(s.max_drawdown >= Decimal::ZERO);
        prop_assert!(s.win_rate >= Decimal::ZERO && s.win_rate <= Decimal::ONE_HUNDRED);
        prop_assert!(s.profit_factor >= Decimal::ZERO);
    }

    #[test]
    fn profit_factor_caps_only_loss_free_histories(trades in history()) {
        let s = analytics::compute(&trades);
        if s.gross_loss.is_zero() {
            let expected = if s.gross_profit > Decimal::ZERO {
                analytics::PROFIT_FACTOR_CAP
            } else {
                Decimal::ZERO
            };
            prop_assert_eq!(s.profit_factor, expected);
        } else {
            prop_assert_eq!(s.profit_factor, s.gross_profit / s.gross_loss);
        }
    }

    #[test]
    fn insights_are_sorted_by_severity(trades in history()) {
        let snapshot = analytics::compute(&trades);
        let found = insights::evaluate(&trades, &common::account(), &[], &[], &snapshot);
        for pair in found.windows(2) {
            prop_assert!(pair[0].severity <= pair[1].severity);
        }
    }

    #[test]
    fn score_stays_in_range(
        net in -500_000i64..=500_000,
        quality in 1u8..=5,
        emotion in prop::sample::select(Emotion::ALL.to_vec()),
        followed_plan: bool,
        checklist_completed: bool,
    ) {
        let mut trade = common::closed("t0", 0, Decimal::new(net, 2));
        trade.session_quality = quality;
        trade.emotion = emotion;
        trade.followed_plan = followed_plan;
        trade.checklist_completed = checklist_completed;
        let analysis = score_trade(&trade, None, None);
        prop_assert!(analysis.score <= 100);
        prop_assert!(!analysis.summary.is_empty());
    }
}
