use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::insights::insight::{money, num, pct};
use crate::insights::{Insight, InsightCategory, InsightKind, RuleContext, Severity};
use crate::types::*;

const DRAWDOWN_EXCESSIVE: Percent = dec!(20);
const DRAWDOWN_MODERATE: Percent = dec!(10);

const LOSING_STREAK_LONG: u32 = 5;
const LOSING_STREAK_MULTIPLE: u32 = 3;

const RECOVERY_FACTOR_LOW: Rate = dec!(2);

/// Maximum drawdown as a share of the account's invested capital. Silent
/// when no capital is recorded.
pub fn drawdown(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let invested = ctx.account.invested_amount;
    if invested <= Decimal::ZERO {
        return vec![];
    }
    let max_dd = ctx.snapshot.max_drawdown;
    let share = max_dd / invested * Decimal::ONE_HUNDRED;

    let insight = if share > DRAWDOWN_EXCESSIVE {
        Insight::new(
            InsightKind::Danger,
            InsightCategory::Risk,
            Severity::High,
            "Excessive Drawdown",
            format!(
                "Maximum drawdown of {} ({} of capital) is dangerous.",
                money(max_dd),
                pct(share)
            ),
            "Cut position sizes by half immediately. A drawdown above 20% points to over-leverage.",
        )
    } else if share > DRAWDOWN_MODERATE {
        Insight::new(
            InsightKind::Warning,
            InsightCategory::Risk,
            Severity::Medium,
            "Moderate Drawdown",
            format!(
                "Drawdown of {} is concerning. Professional traders aim for less than 10%.",
                pct(share)
            ),
            "Reduce position size by 25-30% until risk management is tighter.",
        )
    } else {
        return vec![];
    };

    vec![insight
        .metric("max_drawdown", max_dd)
        .metric("percent", share)]
}

pub fn consecutive_losses(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let streak = ctx.snapshot.max_consecutive_losses;

    let insight = if streak >= LOSING_STREAK_LONG {
        Insight::new(
            InsightKind::Danger,
            InsightCategory::Risk,
            Severity::High,
            "Long Losing Streak",
            format!("{streak} consecutive losses suggest emotional trading or a system breakdown."),
            "Stop trading and take a break. Review whether it was revenge trading, market conditions or strategy failure.",
        )
    } else if streak >= LOSING_STREAK_MULTIPLE {
        Insight::new(
            InsightKind::Warning,
            InsightCategory::Risk,
            Severity::Medium,
            "Multiple Consecutive Losses",
            format!("{streak} losses in a row. Time to reassess."),
            "Step back after three losses and review whether setups are being forced.",
        )
    } else {
        return vec![];
    };

    vec![insight.metric("consecutive_losses", streak)]
}

pub fn recovery_factor(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let rf = ctx.snapshot.recovery_factor;
    if ctx.snapshot.max_drawdown <= Decimal::ZERO || rf >= RECOVERY_FACTOR_LOW {
        return vec![];
    }
    vec![Insight::new(
        InsightKind::Warning,
        InsightCategory::Risk,
        Severity::Medium,
        "Low Recovery Factor",
        format!(
            "Recovery factor of {} indicates slow recovery from drawdowns.",
            num(rf)
        ),
        "Work on consistency. Avoid large losses and focus on steady, smaller wins.",
    )
    .metric("recovery_factor", rf)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::rules::fixtures::{account, run, run_with, titles, trade};
    use crate::journal::Trade;

    fn series(pnls: &[Decimal]) -> Vec<Trade> {
        pnls.iter().enumerate().map(|(i, &p)| trade(i, p)).collect()
    }

    #[test]
    fn test_drawdown_bands_against_capital() {
        let mut acct = account();
        // peak 3000, trough 500 -> drawdown 2500 = 25% of 10000
        let trades = series(&[dec!(3000), dec!(-2500)]);
        let found = run_with(drawdown, &trades, &acct, &[], &[]);
        assert_eq!(titles(&found), vec!["Excessive Drawdown"]);

        acct.invested_amount = dec!(20000);
        let found = run_with(drawdown, &trades, &acct, &[], &[]);
        assert_eq!(titles(&found), vec!["Moderate Drawdown"]);
    }

    #[test]
    fn test_drawdown_silent_without_capital() {
        let mut acct = account();
        acct.invested_amount = Decimal::ZERO;
        let trades = series(&[dec!(-5000)]);
        assert!(run_with(drawdown, &trades, &acct, &[], &[]).is_empty());
    }

    #[test]
    fn test_consecutive_loss_bands() {
        let three = series(&[dec!(10), dec!(-1), dec!(-1), dec!(-1)]);
        assert_eq!(titles(&run(consecutive_losses, &three)), vec!["Multiple Consecutive Losses"]);
        let five = series(&[dec!(-1); 5]);
        let found = run(consecutive_losses, &five);
        assert_eq!(titles(&found), vec!["Long Losing Streak"]);
        assert_eq!(found[0].severity, Severity::High);
        assert!(run(consecutive_losses, &series(&[dec!(-1), dec!(-1)])).is_empty());
    }

    #[test]
    fn test_recovery_factor() {
        // total 100, drawdown 200 -> 0.5
        let trades = series(&[dec!(300), dec!(-200)]);
        assert_eq!(titles(&run(recovery_factor, &trades)), vec!["Low Recovery Factor"]);
        // no drawdown at all
        assert!(run(recovery_factor, &series(&[dec!(10), dec!(20)])).is_empty());
    }
}
