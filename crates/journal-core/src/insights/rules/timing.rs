use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::Tally;
use crate::insights::insight::{capitalize, pct};
use crate::insights::{Insight, InsightCategory, InsightKind, RuleContext, Severity};
use crate::journal::{MarketCondition, TimeOfDay, Trade};
use crate::types::*;

const BEST_SESSION_WIN_RATE: Percent = dec!(60);
const WORST_SESSION_WIN_RATE: Percent = dec!(40);
const BEST_CONDITION_WIN_RATE: Percent = dec!(65);

/// Buckets with at least `gate` closed trades, in `keys` order.
fn buckets<K: Copy + PartialEq>(
    closed: &[&Trade],
    keys: &[K],
    key_of: impl Fn(&Trade) -> Option<K>,
    gate: usize,
) -> Vec<(K, Percent)> {
    keys.iter()
        .map(|&key| {
            let tally = Tally::of(closed.iter().copied().filter(|t| key_of(*t) == Some(key)));
            (key, tally)
        })
        .filter(|(_, tally)| tally.total >= gate)
        .map(|(key, tally)| (key, tally.win_rate()))
        .collect()
}

/// Highest win rate strictly above zero; the earliest bucket keeps ties.
fn best<K: Copy>(rates: &[(K, Percent)]) -> Option<(K, Percent)> {
    let mut best: Option<(K, Percent)> = None;
    for &(key, wr) in rates {
        if wr > best.map_or(Decimal::ZERO, |(_, b)| b) {
            best = Some((key, wr));
        }
    }
    best
}

/// Lowest win rate strictly below 100; the earliest bucket keeps ties.
fn worst<K: Copy>(rates: &[(K, Percent)]) -> Option<(K, Percent)> {
    let mut worst: Option<(K, Percent)> = None;
    for &(key, wr) in rates {
        if wr < worst.map_or(Decimal::ONE_HUNDRED, |(_, w)| w) {
            worst = Some((key, wr));
        }
    }
    worst
}

pub fn time_of_day(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let rates = buckets(
        &ctx.closed,
        &TimeOfDay::ALL,
        |t| t.time_of_day,
        ctx.config.min_samples.time_of_day,
    );
    let mut insights = Vec::new();

    if let Some((time, wr)) = best(&rates).filter(|(_, wr)| *wr > BEST_SESSION_WIN_RATE) {
        insights.push(
            Insight::new(
                InsightKind::Info,
                InsightCategory::Timing,
                Severity::Medium,
                format!("{} is Your Best Time", capitalize(time.as_str())),
                format!("{} win rate during {time} sessions. This is your edge window.", pct(wr)),
                format!("Focus your trading on the {time} session, when you perform best."),
            )
            .metric("time_slot", time.as_str())
            .metric("win_rate", wr),
        );
    }

    if let Some((time, wr)) = worst(&rates).filter(|(_, wr)| *wr < WORST_SESSION_WIN_RATE) {
        insights.push(
            Insight::new(
                InsightKind::Warning,
                InsightCategory::Timing,
                Severity::Medium,
                format!("Avoid Trading During {}", capitalize(time.as_str())),
                format!("Only {} win rate during {time}. You are giving back profits in this window.", pct(wr)),
                format!("Stop trading during {time} and concentrate on your best sessions."),
            )
            .metric("time_slot", time.as_str())
            .metric("win_rate", wr),
        );
    }

    insights
}

pub fn market_condition(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let rates = buckets(
        &ctx.closed,
        &MarketCondition::ALL,
        |t| t.market_condition,
        ctx.config.min_samples.market_condition,
    );

    best(&rates)
        .filter(|(_, wr)| *wr > BEST_CONDITION_WIN_RATE)
        .map(|(condition, wr)| {
            Insight::new(
                InsightKind::Info,
                InsightCategory::MarketConditions,
                Severity::Low,
                format!("Excels in {} Markets", capitalize(condition.as_str())),
                format!("{} win rate in {condition} conditions. This is your ideal environment.", pct(wr)),
                format!("Be selective and wait for {condition} conditions before taking trades."),
            )
            .metric("condition", condition.as_str())
            .metric("win_rate", wr)
        })
        .into_iter()
        .collect()
}
