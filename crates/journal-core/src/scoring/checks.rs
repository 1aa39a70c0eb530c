use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::insights::insight::{num, pct};
use crate::insights::{Insight, InsightCategory, InsightKind, Severity};
use crate::journal::{ChecklistTemplate, Emotion, Strategy, TimeOfDay, Trade};
use crate::types::*;

const RR_TOLERANCE: Rate = dec!(0.5);
const CHECKLIST_COMPLETE_ENOUGH: Percent = dec!(80);
/// A loss running further than this multiple of the planned stop distance
const STOP_OVERRUN: Rate = dec!(1.2);
/// A win closed short of this share of the target distance
const WIN_CUT_SHORT: Rate = dec!(0.5);
const LOW_SESSION_QUALITY: u8 = 2;

/// Per-trade findings carry a severity that follows their kind.
fn finding(
    kind: InsightKind,
    category: InsightCategory,
    title: impl Into<String>,
    message: impl Into<String>,
    action: impl Into<String>,
) -> Insight {
    let severity = match kind {
        InsightKind::Danger => Severity::High,
        InsightKind::Warning => Severity::Medium,
        _ => Severity::Low,
    };
    Insight::new(kind, category, severity, title, message, action)
}

/// Planned against realised R:R. Skipped unless both are recorded.
pub(super) fn risk_reward(trade: &Trade, out: &mut Vec<Insight>) {
    if trade.actual_rr.is_zero() || trade.expected_rr.is_zero() {
        return;
    }
    let diff = trade.actual_rr - trade.expected_rr;
    if diff < -RR_TOLERANCE {
        out.push(
            finding(
                InsightKind::Warning,
                InsightCategory::RiskManagement,
                "R:R Below Target",
                format!(
                    "Achieved R:R of {} is below the {} target. The exit came {} R too early.",
                    num(trade.actual_rr),
                    num(trade.expected_rr),
                    num(diff.abs())
                ),
                "Consider a trailing stop or a partial scale-out to capture more of the move.",
            )
            .metric("difference", diff),
        );
    } else if diff > RR_TOLERANCE {
        out.push(
            finding(
                InsightKind::Success,
                InsightCategory::Execution,
                "R:R Target Exceeded",
                format!(
                    "Achieved {} R:R, beating the {} target by {} R.",
                    num(trade.actual_rr),
                    num(trade.expected_rr),
                    num(diff)
                ),
                "Note what let you capture the extra profit and document it.",
            )
            .metric("difference", diff),
        );
    }
}

pub(super) fn strategy_target(trade: &Trade, strategy: &Strategy, out: &mut Vec<Insight>) {
    if trade.actual_rr < strategy.target_rr - RR_TOLERANCE {
        out.push(finding(
            InsightKind::Warning,
            InsightCategory::Strategy,
            "Strategy R:R Missed",
            format!(
                "\"{}\" targets {} R:R but this trade achieved {}.",
                strategy.name,
                num(strategy.target_rr),
                num(trade.actual_rr)
            ),
            format!("Review the exit rules of {} and whether they were followed.", strategy.name),
        ));
    }
}

/// Completion of the ticked items, then every required item of the
/// template that was skipped or never recorded.
pub(super) fn checklist(trade: &Trade, template: &ChecklistTemplate, out: &mut Vec<Insight>) {
    if trade.checklist_items.is_empty() {
        return;
    }
    let ticked = trade.checklist_items.values().filter(|&&done| done).count();
    let completion = percent_of(ticked, trade.checklist_items.len());

    if completion < CHECKLIST_COMPLETE_ENOUGH && trade.is_loss() {
        out.push(
            finding(
                InsightKind::Danger,
                InsightCategory::Discipline,
                "Incomplete Checklist Loss",
                format!(
                    "Only {} of the checklist was completed and the trade lost. Incomplete preparation likely contributed.",
                    pct(completion)
                ),
                "Complete every checklist item before entry.",
            )
            .metric("completion", completion),
        );
    } else if completion == Decimal::ONE_HUNDRED && trade.is_win() {
        out.push(finding(
            InsightKind::Success,
            InsightCategory::Discipline,
            "Full Checklist Win",
            "Full checklist completion and a winning trade.",
            "This is your winning process. Keep following it.",
        ));
    }

    for item in template.required_items() {
        let done = trade.checklist_items.get(&item.id).copied().unwrap_or(false);
        if !done {
            out.push(
                finding(
                    InsightKind::Danger,
                    InsightCategory::Checklist,
                    format!("Required Item Skipped: \"{}\"", item.text),
                    format!("The required item \"{}\" was not checked.", item.text),
                    "Required checklist items are mandatory. Never skip them.",
                )
                .metric("item_id", item.id.as_str()),
            );
        }
    }
}

pub(super) fn plan(trade: &Trade, out: &mut Vec<Insight>) {
    if !trade.followed_plan && trade.is_loss() {
        out.push(finding(
            InsightKind::Danger,
            InsightCategory::Discipline,
            "Plan Broken on a Loss",
            "You deviated from your plan and lost money.",
            "Write the plan down before every trade and follow it strictly.",
        ));
    } else if trade.followed_plan && trade.is_win() {
        out.push(finding(
            InsightKind::Success,
            InsightCategory::Discipline,
            "Plan Followed on a Win",
            "Followed the plan and won. Your system works when you trust it.",
            "Keep following the plan.",
        ));
    }
}

pub(super) fn emotion(trade: &Trade, out: &mut Vec<Insight>) {
    let emotion = trade.emotion;
    if emotion.is_negative() {
        let (kind, consequence) = if trade.is_loss() {
            (InsightKind::Danger, "Emotion likely caused this loss.")
        } else {
            (
                InsightKind::Warning,
                "It worked out this time, but emotion-driven trades are dangerous.",
            )
        };
        out.push(
            finding(
                kind,
                InsightCategory::Psychology,
                "Emotional Trade",
                format!("Traded while feeling {emotion}. {consequence}"),
                format!("The next time you feel {emotion}, stop and come back when calm."),
            )
            .metric("emotion", emotion.as_str()),
        );
    } else if emotion == Emotion::Disciplined && trade.is_win() {
        out.push(finding(
            InsightKind::Success,
            InsightCategory::Psychology,
            "Disciplined Win",
            "A disciplined mindset led to a winning trade.",
            "Check your emotional state before every trade and only trade when calm.",
        ));
    }
}

/// Stop overrun on losers and early exits on winners, measured as price
/// distance from entry.
pub(super) fn exits(trade: &Trade, out: &mut Vec<Insight>) {
    let stop_distance = (trade.entry_price - trade.stop_loss).abs();
    let target_distance = (trade.take_profit - trade.entry_price).abs();
    let actual_distance = trade
        .exit_price
        .map(|exit| (exit - trade.entry_price).abs())
        .unwrap_or(Decimal::ZERO);

    if trade.is_loss() && actual_distance > stop_distance * STOP_OVERRUN {
        out.push(finding(
            InsightKind::Danger,
            InsightCategory::RiskManagement,
            "Stop Loss Overrun",
            "The loss ran more than 20% past the planned stop.",
            "Always use hard stops. Losses must never exceed the planned risk.",
        ));
    }

    if trade.is_win() && actual_distance < target_distance * WIN_CUT_SHORT {
        out.push(finding(
            InsightKind::Warning,
            InsightCategory::Execution,
            "Winner Cut Short",
            "The winner was closed at less than half of the target distance.",
            "Use trailing stops or partial exits and let winners run.",
        ));
    }
}

pub(super) fn session(trade: &Trade, out: &mut Vec<Insight>) {
    if !trade.is_loss() {
        return;
    }
    if trade.session_quality <= LOW_SESSION_QUALITY {
        out.push(
            finding(
                InsightKind::Warning,
                InsightCategory::Preparation,
                "Low Session Quality Loss",
                format!(
                    "Session quality was rated {} of 5 and the trade lost.",
                    trade.session_quality
                ),
                "Do not trade when you rate the session below 3.",
            )
            .metric("session_quality", u32::from(trade.session_quality)),
        );
    }
    if trade.time_of_day == Some(TimeOfDay::Afterhours) {
        out.push(finding(
            InsightKind::Warning,
            InsightCategory::Timing,
            "After-Hours Loss",
            "After-hours trading resulted in a loss. Liquidity is thin and spreads are wide.",
            "Stick to regular hours unless you have a proven edge after the close.",
        ));
    }
}

/// Only judged when the trade recorded a market condition.
pub(super) fn market_fit(trade: &Trade, strategy: &Strategy, out: &mut Vec<Insight>) {
    let Some(condition) = trade.market_condition else {
        return;
    };
    if strategy.markets.is_empty() || strategy.markets.iter().any(|m| m == condition.as_str()) {
        return;
    }
    out.push(
        finding(
            InsightKind::Warning,
            InsightCategory::Strategy,
            "Strategy Market Mismatch",
            format!(
                "\"{}\" is designed for {} markets, but this trade was taken in {condition} conditions.",
                strategy.name,
                strategy.markets.join("/")
            ),
            "Only use a strategy in the market conditions it was built for.",
        )
        .metric("condition", condition.as_str()),
    );
}

pub(super) fn clean_execution() -> Insight {
    finding(
        InsightKind::Success,
        InsightCategory::Success,
        "Clean Execution",
        "No issues detected. This is a model trade.",
        "Document what made this trade work and repeat the process.",
    )
}
