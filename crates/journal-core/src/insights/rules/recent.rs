use rust_decimal::Decimal;

use super::Tally;
use crate::insights::insight::{money, pct};
use crate::insights::{Insight, InsightCategory, InsightKind, RuleContext, Severity};
use crate::journal::Trade;

/// Share of the window (in tenths) that must be won for a hot streak, or may
/// at most be won for a cold one. With the default window of ten this is 7
/// and 3 wins.
const HOT_TENTHS: usize = 7;
const COLD_TENTHS: usize = 3;

/// The `recent_window` most recently active closed trades, newest first.
/// Equal timestamps keep input order.
fn recent_closed<'a>(closed: &[&'a Trade], window: usize) -> Vec<&'a Trade> {
    let mut recent = closed.to_vec();
    recent.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
    recent.truncate(window);
    recent
}

pub fn recent_form(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let window = ctx.config.recent_window;
    let recent = recent_closed(&ctx.closed, window);
    if recent.len() < window {
        return vec![];
    }

    let tally = Tally::of(recent.iter().copied());
    let wins = tally.wins;
    let win_rate = tally.win_rate();
    let pnl = tally.net_pnl;

    let insight = if wins * 10 >= HOT_TENTHS * window {
        Insight::new(
            InsightKind::Success,
            InsightCategory::RecentForm,
            Severity::Low,
            "On Fire! Hot Streak",
            format!(
                "{wins} wins in the last {window} trades ({} win rate). Total: {}.",
                pct(win_rate),
                money(pnl)
            ),
            "Great momentum. Stay focused, stick to the plan and do not increase risk.",
        )
    } else if wins * 10 <= COLD_TENTHS * window {
        let result = if pnl < Decimal::ZERO { "Down" } else { "Net" };
        Insight::new(
            InsightKind::Danger,
            InsightCategory::RecentForm,
            Severity::High,
            "Cold Streak - Immediate Action Required",
            format!(
                "Only {wins} wins in the last {window} trades ({} win rate). {result} {}.",
                pct(win_rate),
                money(pnl.abs())
            ),
            "Review the recent trades now. Check whether trades are being forced or conditions have changed, and take a break if needed.",
        )
        .related(recent.iter().map(|t| t.id.as_str()))
    } else {
        return vec![];
    };

    vec![insight
        .metric("recent_wins", wins)
        .metric("recent_win_rate", win_rate)
        .metric("recent_pnl", pnl)]
}
