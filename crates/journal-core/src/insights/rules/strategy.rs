use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::Tally;
use crate::insights::insight::{money, num, pct};
use crate::insights::{Insight, InsightCategory, InsightKind, RuleContext, Severity};
use crate::journal::{Strategy, Trade};
use crate::types::*;

const UNDERPERFORMING_WIN_RATE: Percent = dec!(50);
const PERFORMING_WIN_RATE: Percent = dec!(65);
/// Average realised R:R this far below target counts as missing it
const RR_SHORTFALL: Rate = dec!(-0.5);

/// One finding per strategy with enough closed trades. Branches are checked
/// danger first, then the R:R shortfall, then success.
pub fn compliance(ctx: &RuleContext<'_>) -> Vec<Insight> {
    ctx.strategies
        .iter()
        .filter_map(|strategy| assess(ctx, strategy))
        .collect()
}

fn assess(ctx: &RuleContext<'_>, strategy: &Strategy) -> Option<Insight> {
    let trades: Vec<&Trade> = ctx
        .closed
        .iter()
        .copied()
        .filter(|t| t.strategy_id.as_deref() == Some(strategy.id.as_str()))
        .collect();
    if trades.len() < ctx.config.min_samples.strategy {
        return None;
    }

    let tally = Tally::of(trades.iter().copied());
    let win_rate = tally.win_rate();
    let avg_pnl = tally.avg_pnl();
    let avg_rr = trades.iter().map(|t| t.actual_rr).sum::<Decimal>()
        / Decimal::from(trades.len() as u64);
    let rr_difference = avg_rr - strategy.target_rr;
    let ids = trades.iter().map(|t| t.id.as_str());
    let name = &strategy.name;

    let insight = if win_rate < UNDERPERFORMING_WIN_RATE && avg_pnl < Decimal::ZERO {
        Insight::new(
            InsightKind::Danger,
            InsightCategory::Strategy,
            Severity::High,
            format!("{name} Underperforming"),
            format!(
                "This strategy has a {} win rate and an average loss of {} per trade.",
                pct(win_rate),
                money(avg_pnl.abs())
            ),
            format!(
                "Stop using \"{name}\" until the issues are reviewed and fixed. Setup: {}. Entry: {}. Exit: {}.",
                strategy.setup, strategy.entry, strategy.exit
            ),
        )
        .metric("win_rate", win_rate)
        .metric("avg_pnl", avg_pnl)
        .metric("target_rr", strategy.target_rr)
        .metric("actual_rr", avg_rr)
    } else if rr_difference < RR_SHORTFALL {
        Insight::new(
            InsightKind::Warning,
            InsightCategory::Strategy,
            Severity::Medium,
            format!("{name} Missing R:R Target"),
            format!(
                "Target R:R is {}, but you are achieving {}. Exits are too early or stops too wide.",
                num(strategy.target_rr),
                num(avg_rr)
            ),
            "Review your exit rules. Consider trailing stops or scaling out of positions.",
        )
        .metric("target_rr", strategy.target_rr)
        .metric("actual_rr", avg_rr)
        .metric("difference", rr_difference)
    } else if win_rate > PERFORMING_WIN_RATE && avg_pnl > Decimal::ZERO {
        Insight::new(
            InsightKind::Success,
            InsightCategory::Strategy,
            Severity::Low,
            format!("{name} Performing Well"),
            format!(
                "Strong performance: {} win rate with {} average profit. Achieving {} R:R against a {} target.",
                pct(win_rate),
                money(avg_pnl),
                num(avg_rr),
                num(strategy.target_rr)
            ),
            format!(
                "\"{name}\" is your edge. Consider allocating more capital to it and documenting what makes it work."
            ),
        )
        .metric("win_rate", win_rate)
        .metric("avg_pnl", avg_pnl)
        .metric("actual_rr", avg_rr)
    } else {
        return None;
    };

    Some(insight.related(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::rules::fixtures::{account, run_with, trade};

    fn strategy_trade(id: usize, net: Decimal, rr: Decimal) -> Trade {
        let mut t = trade(id, net);
        t.strategy_id = Some("s1".into());
        t.actual_rr = rr;
        t
    }

    fn breakout(target_rr: Decimal) -> Strategy {
        serde_json::from_value(serde_json::json!({
            "id": "s1",
            "name": "Breakout",
            "target_rr": target_rr.to_string(),
        }))
        .unwrap()
    }

    fn run(trades: &[Trade], target_rr: Decimal) -> Vec<Insight> {
        run_with(compliance, trades, &account(), &[breakout(target_rr)], &[])
    }

    #[test]
    fn test_underperforming_strategy_is_danger() {
        let trades: Vec<Trade> = (0..6)
            .map(|i| {
                let net = if i < 2 { dec!(50) } else { dec!(-80) };
                strategy_trade(i, net, dec!(2))
            })
            .collect();
        let found = run(&trades, dec!(2));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Breakout Underperforming");
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[0].related_trades.len(), 6);
    }

    #[test]
    fn test_rr_shortfall_is_warning() {
        let trades: Vec<Trade> = (0..5).map(|i| strategy_trade(i, dec!(40), dec!(1))).collect();
        let found = run(&trades, dec!(2));
        assert_eq!(found[0].title, "Breakout Missing R:R Target");
        assert_eq!(found[0].kind, InsightKind::Warning);
    }

    #[test]
    fn test_strong_strategy_is_success() {
        let trades: Vec<Trade> = (0..5).map(|i| strategy_trade(i, dec!(40), dec!(2))).collect();
        let found = run(&trades, dec!(2));
        assert_eq!(found[0].title, "Breakout Performing Well");
        assert_eq!(found[0].severity, Severity::Low);
    }

    #[test]
    fn test_below_gate_is_silent() {
        let trades: Vec<Trade> = (0..4).map(|i| strategy_trade(i, dec!(-40), dec!(0))).collect();
        assert!(run(&trades, dec!(2)).is_empty());
    }

    #[test]
    fn test_unattributed_trades_ignored() {
        let trades: Vec<Trade> = (0..8).map(|i| trade(i, dec!(-40))).collect();
        assert!(run(&trades, dec!(2)).is_empty());
    }
}
