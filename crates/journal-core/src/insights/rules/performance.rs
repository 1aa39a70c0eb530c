use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::insights::insight::{money, num, pct};
use crate::insights::{Insight, InsightCategory, InsightKind, RuleContext, Severity};
use crate::types::*;

const WIN_RATE_EXCELLENT: Percent = dec!(60);
const WIN_RATE_BELOW_AVERAGE: Percent = dec!(50);
const WIN_RATE_LOW: Percent = dec!(40);

const PROFIT_FACTOR_SUPERIOR: Rate = dec!(2.5);
const PROFIT_FACTOR_LOW: Rate = dec!(1.5);

const AVG_RR_EXCELLENT: Rate = dec!(2);
const AVG_RR_POOR: Rate = dec!(1);

fn closed(ctx: &RuleContext<'_>) -> usize {
    ctx.snapshot.closed_trades as usize
}

pub fn win_rate(ctx: &RuleContext<'_>) -> Vec<Insight> {
    if closed(ctx) < ctx.config.min_samples.win_rate {
        return vec![];
    }
    let wr = ctx.snapshot.win_rate;

    let insight = if wr >= WIN_RATE_EXCELLENT {
        Insight::new(
            InsightKind::Success,
            InsightCategory::Performance,
            Severity::Low,
            "Excellent Win Rate",
            format!(
                "Your win rate of {} is above the 60% benchmark, which points to strong trade selection and entry timing.",
                pct(wr)
            ),
            "Maintain your current approach and keep documenting what makes your winning trades work.",
        )
        .metric("win_rate", wr)
        .metric("benchmark", WIN_RATE_EXCELLENT)
    } else if wr < WIN_RATE_LOW {
        Insight::new(
            InsightKind::Danger,
            InsightCategory::Performance,
            Severity::High,
            "Low Win Rate Alert",
            format!(
                "Your win rate of {} is below the 40% threshold, which suggests problems with trade selection or timing.",
                pct(wr)
            ),
            "Review your losing trades for early or late entries and stop placement. Tighten your entry criteria.",
        )
        .metric("win_rate", wr)
        .metric("benchmark", WIN_RATE_LOW)
    } else if wr < WIN_RATE_BELOW_AVERAGE {
        Insight::new(
            InsightKind::Warning,
            InsightCategory::Performance,
            Severity::Medium,
            "Below-Average Win Rate",
            format!(
                "Win rate of {} is below 50%. Not critical, but there is room for improvement.",
                pct(wr)
            ),
            "Check setup quality and whether trades are being forced. Be more selective with entries.",
        )
        .metric("win_rate", wr)
        .metric("benchmark", WIN_RATE_BELOW_AVERAGE)
    } else {
        return vec![];
    };
    vec![insight]
}

pub fn profit_factor(ctx: &RuleContext<'_>) -> Vec<Insight> {
    if closed(ctx) < ctx.config.min_samples.profit_factor {
        return vec![];
    }
    let pf = ctx.snapshot.profit_factor;

    if pf >= PROFIT_FACTOR_SUPERIOR {
        vec![Insight::new(
            InsightKind::Success,
            InsightCategory::RiskManagement,
            Severity::Low,
            "Superior Profit Factor",
            format!(
                "Profit factor of {} is excellent. Gross wins significantly outweigh gross losses.",
                num(pf)
            ),
            "Document your winning trades to understand what is working. Consider slightly larger size if risk allows.",
        )
        .metric("profit_factor", pf)
        .metric("benchmark", PROFIT_FACTOR_SUPERIOR)]
    } else if pf < PROFIT_FACTOR_LOW {
        vec![Insight::new(
            InsightKind::Danger,
            InsightCategory::RiskManagement,
            Severity::High,
            "Low Profit Factor",
            format!(
                "Profit factor of {} means losses are eating significantly into profits.",
                num(pf)
            ),
            "Let winners run longer and cut losers quicker. Review your exit strategy.",
        )
        .metric("profit_factor", pf)
        .metric("benchmark", PROFIT_FACTOR_LOW)]
    } else {
        vec![]
    }
}

pub fn avg_rr(ctx: &RuleContext<'_>) -> Vec<Insight> {
    if closed(ctx) < ctx.config.min_samples.avg_rr {
        return vec![];
    }
    let rr = ctx.snapshot.avg_rr;

    if rr >= AVG_RR_EXCELLENT {
        vec![Insight::new(
            InsightKind::Success,
            InsightCategory::RiskManagement,
            Severity::Low,
            "Excellent Risk-Reward",
            format!(
                "Average R:R of {} shows effective risk management; you are being paid well for the risk taken.",
                num(rr)
            ),
            "Keep this discipline as you scale.",
        )
        .metric("avg_rr", rr)
        .metric("benchmark", AVG_RR_EXCELLENT)]
    } else if rr < AVG_RR_POOR {
        vec![Insight::new(
            InsightKind::Danger,
            InsightCategory::RiskManagement,
            Severity::High,
            "Poor Risk-Reward Ratio",
            format!(
                "Average R:R of {} means you are risking more than you make. This is unsustainable.",
                num(rr)
            ),
            "Widen targets, tighten stops, or both. Never risk more than you aim to make.",
        )
        .metric("avg_rr", rr)
        .metric("benchmark", AVG_RR_POOR)]
    } else {
        vec![]
    }
}

pub fn expectancy(ctx: &RuleContext<'_>) -> Vec<Insight> {
    if closed(ctx) < ctx.config.min_samples.expectancy {
        return vec![];
    }
    let e = ctx.snapshot.expectancy;

    if e > Decimal::ZERO {
        let per_trade_roi = ratio_or_zero(e, ctx.account.balance) * Decimal::ONE_HUNDRED;
        vec![Insight::new(
            InsightKind::Success,
            InsightCategory::Performance,
            Severity::Low,
            "Positive Expectancy",
            format!(
                "Your system has a positive expectancy of {} per trade ({} of balance).",
                money(e),
                pct(per_trade_roi)
            ),
            "Your edge is proven. Focus on consistency and position sizing to make the most of it.",
        )
        .metric("expectancy", e)
        .metric("per_trade_roi", per_trade_roi)]
    } else {
        vec![Insight::new(
            InsightKind::Danger,
            InsightCategory::Performance,
            Severity::High,
            "Negative Expectancy",
            format!(
                "Expectancy of {} per trade means this system is expected to lose money over time.",
                money(e)
            ),
            "Stop trading this system. Revise the strategy, get a second opinion, or paper trade until it is profitable.",
        )
        .metric("expectancy", e)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::MetricValue;
    use crate::insights::rules::fixtures::{run, run_with, titles, trade};
    use crate::journal::Trade;

    /// `wins` trades at +100 followed by `losses` at -50.
    fn history(wins: usize, losses: usize) -> Vec<Trade> {
        (0..wins + losses)
            .map(|i| trade(i, if i < wins { dec!(100) } else { dec!(-50) }))
            .collect()
    }

    #[test]
    fn test_win_rate_boundary_at_sixty() {
        let found = run(win_rate, &history(12, 8));
        assert_eq!(titles(&found), vec!["Excellent Win Rate"]);
    }

    #[test]
    fn test_win_rate_bands() {
        assert_eq!(titles(&run(win_rate, &history(7, 13))), vec!["Low Win Rate Alert"]);
        assert_eq!(titles(&run(win_rate, &history(9, 11))), vec!["Below-Average Win Rate"]);
        assert!(run(win_rate, &history(11, 9)).is_empty());
    }

    #[test]
    fn test_win_rate_needs_twenty_trades() {
        assert!(run(win_rate, &history(19, 0)).is_empty());
    }

    #[test]
    fn test_profit_factor_without_losses_uses_cap() {
        let found = run(profit_factor, &history(10, 0));
        assert_eq!(titles(&found), vec!["Superior Profit Factor"]);
        assert_eq!(
            found[0].metrics["profit_factor"],
            MetricValue::Number(crate::analytics::PROFIT_FACTOR_CAP)
        );
    }

    #[test]
    fn test_low_profit_factor() {
        // 5 * 100 / 9 * 50 = 1.11
        let found = run(profit_factor, &history(5, 9));
        assert_eq!(found[0].severity, Severity::High);
    }

    #[test]
    fn test_avg_rr_bands() {
        let mut trades = history(10, 0);
        for t in &mut trades {
            t.actual_rr = dec!(2.5);
        }
        assert_eq!(titles(&run(avg_rr, &trades)), vec!["Excellent Risk-Reward"]);
        for t in &mut trades {
            t.actual_rr = dec!(0.8);
        }
        assert_eq!(titles(&run(avg_rr, &trades)), vec!["Poor Risk-Reward Ratio"]);
    }

    #[test]
    fn test_expectancy_roi_against_balance() {
        // 15 * 100 - 10 * 50 = 1000 over 25 trades -> 40 per trade, 0.4% of 10000
        let trades = history(15, 10);
        let found = run(expectancy, &trades);
        assert_eq!(titles(&found), vec!["Positive Expectancy"]);
        assert_eq!(found[0].metrics["per_trade_roi"], MetricValue::Number(dec!(0.4)));
    }

    #[test]
    fn test_zero_balance_roi_guarded() {
        let mut account = crate::insights::rules::fixtures::account();
        account.balance = Decimal::ZERO;
        let found = run_with(expectancy, &history(20, 0), &account, &[], &[]);
        assert_eq!(found[0].metrics["per_trade_roi"], MetricValue::Number(Decimal::ZERO));
    }

    #[test]
    fn test_negative_expectancy_is_danger() {
        let found = run(expectancy, &history(5, 15));
        assert_eq!(titles(&found), vec!["Negative Expectancy"]);
        assert_eq!(found[0].kind, InsightKind::Danger);
    }
}
