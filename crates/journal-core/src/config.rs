use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;
use crate::{JournalError, JournalResult};

/// Minimum number of trades a rule needs before it is allowed to fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinSamples {
    pub win_rate: usize,
    pub profit_factor: usize,
    pub avg_rr: usize,
    pub expectancy: usize,
    /// Closed trades attributed to one strategy
    pub strategy: usize,
    /// Trades carrying any checklist data
    pub checklist: usize,
    /// Trades that recorded a given checklist item
    pub checklist_item: usize,
    /// Required on each side (followed plan / deviated)
    pub plan_adherence: usize,
    /// Per emotion bucket
    pub emotion: usize,
    /// Per time-of-day bucket
    pub time_of_day: usize,
    /// Per market-condition bucket
    pub market_condition: usize,
    /// Losing trades that broke the plan
    pub rule_violations: usize,
    /// Winners closed below half the planned R:R
    pub early_exits: usize,
}

impl Default for MinSamples {
    fn default() -> Self {
        Self {
            win_rate: 20,
            profit_factor: 10,
            avg_rr: 10,
            expectancy: 20,
            strategy: 5,
            checklist: 10,
            checklist_item: 5,
            plan_adherence: 5,
            emotion: 3,
            time_of_day: 5,
            market_condition: 5,
            rule_violations: 3,
            early_exits: 3,
        }
    }
}

impl MinSamples {
    fn gates(&self) -> [(&'static str, usize); 13] {
        [
            ("win_rate", self.win_rate),
            ("profit_factor", self.profit_factor),
            ("avg_rr", self.avg_rr),
            ("expectancy", self.expectancy),
            ("strategy", self.strategy),
            ("checklist", self.checklist),
            ("checklist_item", self.checklist_item),
            ("plan_adherence", self.plan_adherence),
            ("emotion", self.emotion),
            ("time_of_day", self.time_of_day),
            ("market_condition", self.market_condition),
            ("rule_violations", self.rule_violations),
            ("early_exits", self.early_exits),
        ]
    }
}

/// Tunables for the insight engine. Every field falls back to its default
/// when omitted from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// |net P&L| at or below this is a breakeven when auditing outcomes
    pub breakeven_threshold: Money,
    /// Number of most recent closed trades the recent-form rule inspects
    pub recent_window: usize,
    pub min_samples: MinSamples,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            breakeven_threshold: Decimal::ZERO,
            recent_window: 10,
            min_samples: MinSamples::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> JournalResult<()> {
        if self.breakeven_threshold < Decimal::ZERO {
            return Err(JournalError::InvalidInput {
                field: "breakeven_threshold".into(),
                reason: "Breakeven threshold cannot be negative.".into(),
            });
        }
        if self.recent_window == 0 {
            return Err(JournalError::InvalidInput {
                field: "recent_window".into(),
                reason: "Recent window must cover at least one trade.".into(),
            });
        }
        for (name, value) in self.min_samples.gates() {
            if value == 0 {
                return Err(JournalError::InvalidInput {
                    field: format!("min_samples.{name}"),
                    reason: "Sample gates must be at least 1.".into(),
                });
            }
        }
        Ok(())
    }
}
