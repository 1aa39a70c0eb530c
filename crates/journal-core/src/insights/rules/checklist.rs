use rust_decimal_macros::dec;

use super::Tally;
use crate::insights::insight::pct;
use crate::insights::{Insight, InsightCategory, InsightKind, RuleContext, Severity};
use crate::journal::{ChecklistTemplate, Trade};
use crate::types::*;

const SIGNIFICANT_DELTA: Percent = dec!(15);
const POSITIVE_DELTA: Percent = dec!(5);
const CRITICAL_ITEM_IMPACT: Percent = dec!(20);

/// Win rate with the checklist completed against win rate without it, over
/// trades that recorded any checklist data.
pub fn adherence(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let tracked: Vec<&Trade> = ctx
        .closed
        .iter()
        .copied()
        .filter(|t| !t.checklist_items.is_empty())
        .collect();
    if tracked.len() < ctx.config.min_samples.checklist {
        return vec![];
    }

    let (completed, skipped): (Vec<&Trade>, Vec<&Trade>) =
        tracked.into_iter().partition(|t| t.checklist_completed);
    if completed.is_empty() || skipped.is_empty() {
        return vec![];
    }

    let complete_wr = Tally::of(completed).win_rate();
    let incomplete_wr = Tally::of(skipped).win_rate();
    let difference = complete_wr - incomplete_wr;

    let insight = if difference > SIGNIFICANT_DELTA {
        Insight::new(
            InsightKind::Info,
            InsightCategory::Checklist,
            Severity::High,
            "Checklist Significantly Improves Results",
            format!(
                "Win rate is {} when completing the checklist against {} when skipping items, a {} improvement.",
                pct(complete_wr),
                pct(incomplete_wr),
                pct(difference)
            ),
            "Always complete your pre-trade checklist. The data shows it matters.",
        )
    } else if difference > POSITIVE_DELTA {
        Insight::new(
            InsightKind::Info,
            InsightCategory::Checklist,
            Severity::Medium,
            "Checklist Shows Positive Impact",
            format!(
                "Completing the checklist improves win rate by {} ({} against {}).",
                pct(difference),
                pct(complete_wr),
                pct(incomplete_wr)
            ),
            "Your checklist is helping. Make completing it a habit before every trade.",
        )
    } else {
        return vec![];
    };

    vec![insight
        .metric("complete_win_rate", complete_wr)
        .metric("incomplete_win_rate", incomplete_wr)
        .metric("difference", difference)]
}

/// Win-rate impact of each required item of the active (first) template.
pub fn item_impact(ctx: &RuleContext<'_>) -> Vec<Insight> {
    let Some(template) = ChecklistTemplate::active(ctx.checklists) else {
        return vec![];
    };

    let mut insights = Vec::new();
    for item in template.required_items() {
        let recorded: Vec<(&Trade, bool)> = ctx
            .closed
            .iter()
            .filter_map(|&t| t.checklist_items.get(&item.id).map(|&ticked| (t, ticked)))
            .collect();
        if recorded.len() < ctx.config.min_samples.checklist_item {
            continue;
        }

        let checked = Tally::of(recorded.iter().filter(|(_, ticked)| *ticked).map(|(t, _)| *t));
        let skipped = Tally::of(recorded.iter().filter(|(_, ticked)| !*ticked).map(|(t, _)| *t));
        if checked.total == 0 || skipped.total == 0 {
            continue;
        }

        let impact = checked.win_rate() - skipped.win_rate();
        if impact > CRITICAL_ITEM_IMPACT {
            insights.push(
                Insight::new(
                    InsightKind::Info,
                    InsightCategory::Checklist,
                    Severity::High,
                    format!("Critical Checklist Item: \"{}\"", item.text),
                    format!(
                        "This item has a large impact: {} win rate when checked against {} when skipped.",
                        pct(checked.win_rate()),
                        pct(skipped.win_rate())
                    ),
                    format!("Never skip \"{}\". It is one of your most important edge factors.", item.text),
                )
                .metric("item_id", item.id.as_str())
                .metric("completed_win_rate", checked.win_rate())
                .metric("skipped_win_rate", skipped.win_rate())
                .metric("impact", impact),
            );
        }
    }
    insights
}
