//! Per-Trade Scorer: grades a single trade on a 0-100 scale and explains
//! the grade with findings drawn from the same vocabulary as the insight
//! engine.

mod checks;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::insights::{Insight, InsightKind};
use crate::journal::{ChecklistTemplate, Emotion, Strategy, Trade};
use crate::types::*;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAnalysis {
    pub insights: Vec<Insight>,
    /// 0 (poor) to 100 (excellent)
    pub score: u8,
    pub summary: String,
}

const BASELINE: i32 = 50;
const HALF: Rate = dec!(0.5);

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Review one trade against its strategy and checklist template.
pub fn score_trade(
    trade: &Trade,
    strategy: Option<&Strategy>,
    checklist: Option<&ChecklistTemplate>,
) -> TradeAnalysis {
    let mut insights = Vec::new();

    checks::risk_reward(trade, &mut insights);
    if let Some(strategy) = strategy {
        checks::strategy_target(trade, strategy, &mut insights);
    }
    if let Some(template) = checklist {
        checks::checklist(trade, template, &mut insights);
    }
    checks::plan(trade, &mut insights);
    checks::emotion(trade, &mut insights);
    checks::exits(trade, &mut insights);
    checks::session(trade, &mut insights);
    if let Some(strategy) = strategy {
        checks::market_fit(trade, strategy, &mut insights);
    }

    let dangers = count(&insights, InsightKind::Danger);
    let warnings = count(&insights, InsightKind::Warning);
    if dangers == 0 && warnings == 0 && trade.is_win() {
        insights.push(checks::clean_execution());
    }

    let score = score(trade, dangers, warnings);
    debug!(trade = %trade.id, score, dangers, warnings, "scored trade");

    TradeAnalysis {
        summary: summary(trade, score, dangers + warnings),
        insights,
        score,
    }
}

/// Pick the trade's strategy by id and the active checklist template, then
/// score it.
pub fn analyze_trade(
    trade: &Trade,
    strategies: &[Strategy],
    checklists: &[ChecklistTemplate],
) -> TradeAnalysis {
    let strategy = trade
        .strategy_id
        .as_deref()
        .and_then(|id| strategies.iter().find(|s| s.id == id));
    score_trade(trade, strategy, ChecklistTemplate::active(checklists))
}

fn count(insights: &[Insight], kind: InsightKind) -> i32 {
    insights.iter().filter(|i| i.kind == kind).count() as i32
}

fn score(trade: &Trade, dangers: i32, warnings: i32) -> u8 {
    let mut score = BASELINE;

    if trade.is_win() {
        score += 30;
    } else if trade.is_loss() {
        score -= 30;
    }

    if trade.actual_rr >= trade.expected_rr {
        score += 10;
    } else if trade.actual_rr < trade.expected_rr * HALF {
        score -= 10;
    }

    score += if trade.followed_plan { 10 } else { -15 };
    score += if trade.checklist_completed { 10 } else { -10 };

    if trade.emotion == Emotion::Disciplined {
        score += 5;
    } else if trade.emotion.is_negative() {
        score -= 10;
    }

    score += (i32::from(trade.session_quality) - 3) * 3;
    score -= dangers * 5 + warnings * 2;

    score.clamp(0, 100) as u8
}

fn summary(trade: &Trade, score: u8, issues: i32) -> String {
    if score >= 80 {
        let outcome = if trade.is_win() {
            "A well-deserved win"
        } else {
            "Even losses can be executed well"
        };
        format!("Excellent trade execution ({score}/100). {outcome}. This is the standard to maintain.")
    } else if score >= 60 {
        format!("Good trade execution ({score}/100). {issues} area(s) for improvement identified.")
    } else if score >= 40 {
        format!("Average execution ({score}/100). Multiple issues detected; this trade needs careful review.")
    } else {
        format!("Poor execution ({score}/100). Significant problems identified; use it as a learning opportunity.")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{MarketCondition, TimeOfDay};
    use rust_decimal::Decimal;

    fn base_trade(net: Decimal) -> Trade {
        let won = net > Decimal::ZERO;
        let outcome = if won { "win" } else { "loss" };
        let exit_price = if won { "110" } else { "95" };
        let actual_rr = if won { "2" } else { "-1" };
        serde_json::from_value(serde_json::json!({
            "id": "t1",
            "account_id": "acc-1",
            "symbol": "AAPL",
            "direction": "long",
            "entry_price": "100",
            "exit_price": exit_price,
            "stop_loss": "95",
            "take_profit": "110",
            "expected_rr": "2",
            "actual_rr": actual_rr,
            "entry_date": "2024-03-04T14:30:00Z",
            "exit_date": "2024-03-04T16:00:00Z",
            "status": "closed",
            "outcome": outcome,
            "net_pnl": net.to_string(),
            "followed_plan": true,
            "checklist_completed": true,
        }))
        .unwrap()
    }

    fn titles(analysis: &TradeAnalysis) -> Vec<&str> {
        analysis.insights.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_model_win_scores_high() {
        let mut trade = base_trade(dec!(100));
        trade.emotion = Emotion::Disciplined;
        let analysis = score_trade(&trade, None, None);
        // 50 + 30 + 10 + 10 + 10 + 5 = 115, clamped
        assert_eq!(analysis.score, 100);
        assert!(titles(&analysis).contains(&"Clean Execution"));
        assert!(analysis.summary.starts_with("Excellent trade execution (100/100)"));
    }

    #[test]
    fn test_undisciplined_loss_is_clamped_to_zero() {
        let mut trade = base_trade(dec!(-80));
        trade.followed_plan = false;
        trade.checklist_completed = false;
        trade.emotion = Emotion::Revenge;
        trade.session_quality = 1;
        trade.exit_price = Some(dec!(90));
        let analysis = score_trade(&trade, None, None);
        assert_eq!(analysis.score, 0);
        let t = titles(&analysis);
        assert!(t.contains(&"Plan Broken on a Loss"));
        assert!(t.contains(&"Emotional Trade"));
        assert!(t.contains(&"Stop Loss Overrun"));
        assert!(t.contains(&"Low Session Quality Loss"));
        assert!(analysis.summary.starts_with("Poor execution"));
    }

    #[test]
    fn test_emotional_win_is_a_warning_not_clean() {
        let mut trade = base_trade(dec!(100));
        trade.emotion = Emotion::Fomo;
        let analysis = score_trade(&trade, None, None);
        let emotional = analysis
            .insights
            .iter()
            .find(|i| i.title == "Emotional Trade")
            .unwrap();
        assert_eq!(emotional.kind, InsightKind::Warning);
        assert!(!titles(&analysis).contains(&"Clean Execution"));
        // 50 + 30 + 10 + 10 + 10 - 10 - 2
        assert_eq!(analysis.score, 98);
    }

    #[test]
    fn test_required_item_skipped_and_missing() {
        let template: ChecklistTemplate = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "name": "Pre-trade",
            "items": [
                {"id": "a", "text": "Trend aligned", "category": "pre-trade", "required": true},
                {"id": "b", "text": "Level marked", "category": "pre-trade", "required": true},
                {"id": "c", "text": "News checked", "category": "pre-trade"}
            ]
        }))
        .unwrap();
        let mut trade = base_trade(dec!(-50));
        trade.checklist_items.insert("a".into(), false);
        trade.checklist_items.insert("c".into(), true);
        let analysis = score_trade(&trade, None, Some(&template));
        let t = titles(&analysis);
        assert!(t.contains(&"Incomplete Checklist Loss"));
        assert!(t.contains(&"Required Item Skipped: \"Trend aligned\""));
        assert!(t.contains(&"Required Item Skipped: \"Level marked\""));
    }

    #[test]
    fn test_strategy_mismatch_and_target() {
        let strategy: Strategy = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "name": "Pullback",
            "target_rr": "3",
            "markets": ["trending"],
        }))
        .unwrap();
        let mut trade = base_trade(dec!(100));
        trade.strategy_id = Some("s1".into());
        trade.market_condition = Some(MarketCondition::Ranging);
        let analysis = analyze_trade(&trade, &[strategy], &[]);
        let t = titles(&analysis);
        assert!(t.contains(&"Strategy R:R Missed"));
        assert!(t.contains(&"Strategy Market Mismatch"));
    }

    #[test]
    fn test_after_hours_loss_and_cut_winner() {
        let mut loser = base_trade(dec!(-50));
        loser.time_of_day = Some(TimeOfDay::Afterhours);
        assert!(titles(&score_trade(&loser, None, None)).contains(&"After-Hours Loss"));

        let mut winner = base_trade(dec!(20));
        winner.exit_price = Some(dec!(102));
        assert!(titles(&score_trade(&winner, None, None)).contains(&"Winner Cut Short"));
    }

    #[test]
    fn test_summary_bands() {
        let trade = base_trade(dec!(100));
        assert!(summary(&trade, 60, 2).starts_with("Good trade execution (60/100). 2 area(s)"));
        assert!(summary(&trade, 59, 0).starts_with("Average execution"));
        assert!(summary(&trade, 39, 0).starts_with("Poor execution"));
    }
}
