use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::insights::insight::money;
use crate::insights::{Insight, InsightCategory, InsightKind, RuleContext, Severity};
use crate::journal::Trade;
use crate::types::*;

/// A winner closed below this share of its planned R:R left money behind.
const EARLY_EXIT_SHARE: Rate = dec!(0.5);

/// Losing trades taken against the plan.
pub fn rule_violations(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let violations: Vec<&Trade> = ctx
        .closed
        .iter()
        .copied()
        .filter(|t| !t.followed_plan && t.is_loss())
        .collect();
    if violations.len() < ctx.config.min_samples.rule_violations {
        return vec![];
    }

    let total_loss: Money = violations.iter().map(|t| t.net_pnl.abs()).sum();
    vec![Insight::new(
        InsightKind::Warning,
        InsightCategory::Discipline,
        Severity::High,
        "Rule Violations Causing Losses",
        format!(
            "{} losing trades where the plan was not followed. Total damage: {}.",
            violations.len(),
            money(total_loss)
        ),
        "Every broken rule costs you. Keep your rules in sight and follow them.",
    )
    .related(violations.iter().map(|t| t.id.as_str()))
    .metric("violation_count", violations.len())
    .metric("total_loss", total_loss)]
}

/// Profit a winner would have made at its planned R:R, less what it made.
/// Zero when no R:R was realised, `None` when the estimate overflows.
fn left_on_table(trade: &Trade) -> Option<Money> {
    if trade.actual_rr.is_zero() {
        return Some(Decimal::ZERO);
    }
    trade
        .expected_rr
        .checked_div(trade.actual_rr)?
        .checked_mul(trade.net_pnl)?
        .checked_sub(trade.net_pnl)
}

/// Winners closed below half their planned R:R.
pub fn early_exits(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let early: Vec<&Trade> = ctx
        .closed
        .iter()
        .copied()
        .filter(|t| t.is_win() && t.actual_rr < t.expected_rr * EARLY_EXIT_SHARE)
        .collect();
    if early.len() < ctx.config.min_samples.early_exits {
        return vec![];
    }

    let lost_profit: Money = early
        .iter()
        .filter_map(|t| left_on_table(t))
        .fold(Decimal::ZERO, Decimal::saturating_add);
    vec![Insight::new(
        InsightKind::Warning,
        InsightCategory::Execution,
        Severity::Medium,
        "Exiting Winners Too Early",
        format!(
            "{} winning trades exited below 50% of their target R:R, leaving {} on the table.",
            early.len(),
            money(lost_profit)
        ),
        "Use trailing stops or scale out of positions instead of cutting winners short.",
    )
    .related(early.iter().map(|t| t.id.as_str()))
    .metric("early_exit_count", early.len())
    .metric("lost_profit", lost_profit)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::MetricValue;
    use crate::insights::rules::fixtures::{run, titles, trade};

    #[test]
    fn test_rule_violation_damage() {
        let mut trades: Vec<Trade> = (0..4).map(|i| trade(i, dec!(-25))).collect();
        trades[3].followed_plan = true;
        let found = run(rule_violations, &trades);
        assert_eq!(titles(&found), vec!["Rule Violations Causing Losses"]);
        assert_eq!(found[0].metrics["total_loss"], MetricValue::Number(dec!(75)));
        assert_eq!(found[0].related_trades, vec!["t0", "t1", "t2"]);
        assert_eq!(found[0].category, InsightCategory::Discipline);
    }

    #[test]
    fn test_two_violations_below_gate() {
        let trades: Vec<Trade> = (0..2).map(|i| trade(i, dec!(-25))).collect();
        assert!(run(rule_violations, &trades).is_empty());
    }

    #[test]
    fn test_early_exit_estimate() {
        // planned 3R, took 1R for +100 -> 300 - 100 = 200 left each
        let trades: Vec<Trade> = (0..3)
            .map(|i| {
                let mut t = trade(i, dec!(100));
                t.expected_rr = dec!(3);
                t.actual_rr = dec!(1);
                t
            })
            .collect();
        let found = run(early_exits, &trades);
        assert_eq!(titles(&found), vec!["Exiting Winners Too Early"]);
        assert_eq!(found[0].metrics["lost_profit"], MetricValue::Number(dec!(600)));
        assert_eq!(found[0].severity, Severity::Medium);
    }

    #[test]
    fn test_zero_realised_rr_contributes_nothing() {
        let mut t = trade(0, dec!(100));
        t.expected_rr = dec!(2);
        assert_eq!(left_on_table(&t), Some(Decimal::ZERO));
    }

    fn sliver_winner(id: usize, expected_rr: Decimal) -> Trade {
        let mut t = trade(id, dec!(1000000));
        t.expected_rr = expected_rr;
        t.actual_rr = Decimal::new(1, 22);
        t
    }

    #[test]
    fn test_overflowing_estimate_is_skipped() {
        assert_eq!(left_on_table(&sliver_winner(0, dec!(100))), None);
    }

    #[test]
    fn test_huge_estimates_saturate_total() {
        let trades: Vec<Trade> = (0..3).map(|i| sliver_winner(i, dec!(3))).collect();
        let found = run(early_exits, &trades);
        assert_eq!(titles(&found), vec!["Exiting Winners Too Early"]);
        assert_eq!(found[0].metrics["lost_profit"], MetricValue::Number(Decimal::MAX));
    }
}
