use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::*;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    #[default]
    Open,
    Closed,
    Partial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Breakeven,
    #[default]
    Pending,
}

/// Self-reported emotional state at entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Disciplined,
    Confident,
    #[default]
    Neutral,
    Fearful,
    Greedy,
    Revenge,
    Fomo,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Disciplined,
        Emotion::Confident,
        Emotion::Neutral,
        Emotion::Fearful,
        Emotion::Greedy,
        Emotion::Revenge,
        Emotion::Fomo,
    ];

    /// Emotional states treated as compromising execution.
    pub const NEGATIVE: [Emotion; 4] = [
        Emotion::Fearful,
        Emotion::Greedy,
        Emotion::Revenge,
        Emotion::Fomo,
    ];

    pub fn is_negative(self) -> bool {
        Self::NEGATIVE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Disciplined => "disciplined",
            Emotion::Confident => "confident",
            Emotion::Neutral => "neutral",
            Emotion::Fearful => "fearful",
            Emotion::Greedy => "greedy",
            Emotion::Revenge => "revenge",
            Emotion::Fomo => "fomo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Premarket,
    Morning,
    Midday,
    Afternoon,
    Afterhours,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 5] = [
        TimeOfDay::Premarket,
        TimeOfDay::Morning,
        TimeOfDay::Midday,
        TimeOfDay::Afternoon,
        TimeOfDay::Afterhours,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Premarket => "premarket",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Midday => "midday",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Afterhours => "afterhours",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketCondition {
    Trending,
    Ranging,
    Volatile,
    Quiet,
}

impl MarketCondition {
    pub const ALL: [MarketCondition; 4] = [
        MarketCondition::Trending,
        MarketCondition::Ranging,
        MarketCondition::Volatile,
        MarketCondition::Quiet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MarketCondition::Trending => "trending",
            MarketCondition::Ranging => "ranging",
            MarketCondition::Volatile => "volatile",
            MarketCondition::Quiet => "quiet",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Emotion, TimeOfDay, MarketCondition);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[default]
    Live,
    Demo,
    Paper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistCategory {
    PreTrade,
    DuringTrade,
    PostTrade,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A scale-out executed before the position was fully closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialExit {
    pub price: Money,
    pub quantity: Decimal,
    pub date: DateTime<Utc>,
    pub pnl: Money,
}

/// One journaled position.
///
/// Trades are immutable snapshots from the engine's point of view; the
/// persistence layer that owns them keeps `net_pnl` equal to
/// `gross_pnl - (fees + commissions + slippage * quantity * lot_size)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: Money,
    /// None while the position is open
    #[serde(default)]
    pub exit_price: Option<Money>,
    #[serde(default = "one")]
    pub lot_size: Decimal,
    #[serde(default = "one")]
    pub quantity: Decimal,
    #[serde(default)]
    pub stop_loss: Money,
    #[serde(default)]
    pub take_profit: Money,
    /// Planned reward / risk at entry
    #[serde(default)]
    pub expected_rr: Rate,
    /// Realised reward / risk at exit
    #[serde(default)]
    pub actual_rr: Rate,
    pub entry_date: DateTime<Utc>,
    #[serde(default)]
    pub exit_date: Option<DateTime<Utc>>,
    pub status: TradeStatus,
    pub outcome: Outcome,
    #[serde(default)]
    pub gross_pnl: Money,
    #[serde(default)]
    pub pnl_percentage: Percent,
    #[serde(default)]
    pub fees: Money,
    #[serde(default)]
    pub commissions: Money,
    /// Per-unit slippage, scaled by quantity and lot size when costed
    #[serde(default)]
    pub slippage: Money,
    #[serde(default)]
    pub net_pnl: Money,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub pre_trade_notes: String,
    #[serde(default)]
    pub post_trade_notes: String,
    #[serde(default)]
    pub mistakes: String,
    #[serde(default)]
    pub lessons_learned: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub strategy_id: Option<String>,
    #[serde(default)]
    pub emotion: Emotion,
    #[serde(default)]
    pub checklist_completed: bool,
    /// Checklist item id -> ticked
    #[serde(default)]
    pub checklist_items: BTreeMap<String, bool>,
    /// 1 (poor) to 5 (excellent)
    #[serde(default = "default_session_quality")]
    pub session_quality: u8,
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default)]
    pub market_condition: Option<MarketCondition>,
    #[serde(default)]
    pub followed_plan: bool,
    #[serde(default)]
    pub partial_exits: Vec<PartialExit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_before_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_after_url: Option<String>,
}

fn one() -> Decimal {
    Decimal::ONE
}

fn default_session_quality() -> u8 {
    3
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }

    pub fn is_loss(&self) -> bool {
        self.outcome == Outcome::Loss
    }

    /// Sum of fees, commissions and scaled slippage.
    pub fn total_costs(&self) -> Money {
        self.fees + self.commissions + self.slippage * self.quantity * self.lot_size
    }

    /// Exit date when present, otherwise entry date. Used for recency ordering.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.exit_date.unwrap_or(self.entry_date)
    }
}

/// A brokerage account the journal tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub kind: AccountKind,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub balance: Money,
    /// Starting balance before any journaled trade; falls back to `balance`
    #[serde(default)]
    pub initial_balance: Option<Money>,
    #[serde(default)]
    pub invested_amount: Money,
    /// Derived: Σ net P&L of the account's trades
    #[serde(default)]
    pub total_pnl: Money,
}

/// A named rule set that trades can be attributed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub setup: String,
    #[serde(default)]
    pub entry: String,
    #[serde(default)]
    pub exit: String,
    #[serde(default)]
    pub stop_loss: String,
    pub target_rr: Rate,
    #[serde(default)]
    pub timeframes: Vec<String>,
    /// Market-condition names the strategy is designed for; empty means any
    #[serde(default)]
    pub markets: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "active_default")]
    pub active: bool,
}

fn active_default() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub category: ChecklistCategory,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistTemplate {
    pub id: String,
    pub name: String,
    pub items: Vec<ChecklistItem>,
}

impl ChecklistTemplate {
    /// Only the first template of a collection is treated as active.
    pub fn active(templates: &[ChecklistTemplate]) -> Option<&ChecklistTemplate> {
        templates.first()
    }

    pub fn required_items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.items.iter().filter(|item| item.required)
    }
}
