use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use super::Tally;
use crate::insights::insight::{capitalize, pct};
use crate::insights::{Insight, InsightCategory, InsightKind, RuleContext, Severity};
use crate::journal::{Emotion, Trade};
use crate::types::*;

const PLAN_DELTA: Percent = dec!(15);
const EMOTION_DELTA: Percent = dec!(20);
const TOXIC_EMOTION_WIN_RATE: Percent = dec!(35);

/// At least one of these must qualify before the disciplined comparison
/// runs; `fomo` only joins the average once it does.
const COMPARISON_TRIGGERS: [Emotion; 3] = [Emotion::Greedy, Emotion::Fearful, Emotion::Revenge];

/// Followers of the plan against those who deviated, with enough closed
/// trades on each side.
pub fn plan_adherence(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let (followed, broke): (Vec<&Trade>, Vec<&Trade>) =
        ctx.closed.iter().copied().partition(|t| t.followed_plan);
    let gate = ctx.config.min_samples.plan_adherence;
    if followed.len() < gate || broke.len() < gate {
        return vec![];
    }

    let follower_wr = Tally::of(followed).win_rate();
    let breaker_wr = Tally::of(broke).win_rate();
    let difference = follower_wr - breaker_wr;
    if difference <= PLAN_DELTA {
        return vec![];
    }

    vec![Insight::new(
        InsightKind::Discipline,
        InsightCategory::Psychology,
        Severity::High,
        "Plan Adherence Critical",
        format!(
            "Win rate is {} when following the plan against {} when deviating.",
            pct(follower_wr),
            pct(breaker_wr)
        ),
        "Your plan works when you follow it. Review it before every trade.",
    )
    .metric("follower_win_rate", follower_wr)
    .metric("breaker_win_rate", breaker_wr)
    .metric("difference", difference)]
}

/// Closed-trade tallies per emotion, keeping only buckets that meet the
/// sample gate.
fn emotion_buckets(ctx: &RuleContext<'_>) -> BTreeMap<Emotion, Tally> {
    Emotion::ALL
        .iter()
        .map(|&emotion| {
            let tally = Tally::of(ctx.closed.iter().copied().filter(|t| t.emotion == emotion));
            (emotion, tally)
        })
        .filter(|(_, tally)| tally.total >= ctx.config.min_samples.emotion)
        .collect()
}

/// Disciplined win rate against the mean win rate of the negative emotions,
/// then the single worst negative emotion.
pub fn emotions(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let buckets = emotion_buckets(ctx);
    let mut insights = Vec::new();

    let negative: Vec<Percent> = Emotion::NEGATIVE
        .iter()
        .filter_map(|e| buckets.get(e))
        .map(Tally::win_rate)
        .collect();

    let triggered = COMPARISON_TRIGGERS.iter().any(|e| buckets.contains_key(e));
    if let Some(disciplined) = buckets.get(&Emotion::Disciplined) {
        if triggered && !negative.is_empty() {
            let disciplined_wr = disciplined.win_rate();
            let emotional_wr =
                negative.iter().copied().sum::<Decimal>() / Decimal::from(negative.len() as u64);
            let difference = disciplined_wr - emotional_wr;
            if difference > EMOTION_DELTA {
                insights.push(
                    Insight::new(
                        InsightKind::Discipline,
                        InsightCategory::Psychology,
                        Severity::High,
                        "Emotional Trading Destroying Results",
                        format!(
                            "{} win rate when disciplined against {} when emotional. Emotion costs you {}.",
                            pct(disciplined_wr),
                            pct(emotional_wr),
                            pct(difference)
                        ),
                        "Check your emotional state before every trade. If you are not calm and disciplined, do not trade.",
                    )
                    .metric("disciplined_win_rate", disciplined_wr)
                    .metric("emotional_win_rate", emotional_wr)
                    .metric("difference", difference),
                );
            }
        }
    }

    // Strictly lower wins, so the first emotion in declaration order keeps ties.
    let mut worst: Option<(Emotion, Percent)> = None;
    for emotion in Emotion::NEGATIVE {
        if let Some(tally) = buckets.get(&emotion) {
            let wr = tally.win_rate();
            if worst.map_or(true, |(_, w)| wr < w) {
                worst = Some((emotion, wr));
            }
        }
    }

    if let Some((emotion, wr)) = worst.filter(|(_, wr)| *wr < TOXIC_EMOTION_WIN_RATE) {
        insights.push(
            Insight::new(
                InsightKind::Warning,
                InsightCategory::Psychology,
                Severity::High,
                format!("Avoid Trading When {}", capitalize(emotion.as_str())),
                format!("Only {} win rate when feeling {emotion}.", pct(wr)),
                format!("Treat feeling {emotion} as a signal to stop. Take a break and come back later."),
            )
            .metric("emotion", emotion.as_str())
            .metric("win_rate", wr),
        );
    }

    insights
}
