//! Insight Rule Engine.
//!
//! Each rule is a self-contained function over a shared [`RuleContext`]: it
//! checks its own minimum-sample gate, computes what it needs and returns
//! zero or more [`Insight`]s. [`evaluate`] runs the table in order,
//! concatenates the results and sorts them by severity (stable).

pub mod insight;
pub mod rules;

use tracing::debug;

use crate::analytics::AnalyticsSnapshot;
use crate::config::AnalysisConfig;
use crate::journal::{Account, ChecklistTemplate, Strategy, Trade};

pub use insight::*;

/// Read-only inputs shared by every rule.
pub struct RuleContext<'a> {
    pub trades: &'a [Trade],
    /// The `closed` subset of `trades`, in input order
    pub closed: Vec<&'a Trade>,
    pub account: &'a Account,
    pub strategies: &'a [Strategy],
    pub checklists: &'a [ChecklistTemplate],
    pub snapshot: &'a AnalyticsSnapshot,
    pub config: &'a AnalysisConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        trades: &'a [Trade],
        account: &'a Account,
        strategies: &'a [Strategy],
        checklists: &'a [ChecklistTemplate],
        snapshot: &'a AnalyticsSnapshot,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            trades,
            closed: trades.iter().filter(|t| t.is_closed()).collect(),
            account,
            strategies,
            checklists,
            snapshot,
            config,
        }
    }
}

pub type Rule = fn(&RuleContext<'_>) -> Vec<Insight>;

/// Every rule the engine evaluates, in emission order.
pub const RULES: &[(&str, Rule)] = &[
    ("win_rate", rules::performance::win_rate),
    ("profit_factor", rules::performance::profit_factor),
    ("avg_rr", rules::performance::avg_rr),
    ("expectancy", rules::performance::expectancy),
    ("strategy_compliance", rules::strategy::compliance),
    ("checklist_adherence", rules::checklist::adherence),
    ("checklist_items", rules::checklist::item_impact),
    ("drawdown", rules::risk::drawdown),
    ("consecutive_losses", rules::risk::consecutive_losses),
    ("recovery_factor", rules::risk::recovery_factor),
    ("plan_adherence", rules::psychology::plan_adherence),
    ("emotions", rules::psychology::emotions),
    ("time_of_day", rules::timing::time_of_day),
    ("market_condition", rules::timing::market_condition),
    ("recent_form", rules::recent::recent_form),
    ("rule_violations", rules::audit::rule_violations),
    ("early_exits", rules::audit::early_exits),
];

/// Evaluate every rule with the default thresholds.
pub fn evaluate(
    trades: &[Trade],
    account: &Account,
    strategies: &[Strategy],
    checklists: &[ChecklistTemplate],
    snapshot: &AnalyticsSnapshot,
) -> Vec<Insight> {
    evaluate_with_config(
        trades,
        account,
        strategies,
        checklists,
        snapshot,
        &AnalysisConfig::default(),
    )
}

pub fn evaluate_with_config(
    trades: &[Trade],
    account: &Account,
    strategies: &[Strategy],
    checklists: &[ChecklistTemplate],
    snapshot: &AnalyticsSnapshot,
    config: &AnalysisConfig,
) -> Vec<Insight> {
    let ctx = RuleContext::new(trades, account, strategies, checklists, snapshot, config);
    let mut insights = Vec::new();
    for (name, rule) in RULES {
        let found = rule(&ctx);
        debug!(rule = *name, count = found.len(), "evaluated insight rule");
        insights.extend(found);
    }
    sort_by_severity(&mut insights);
    insights
}
