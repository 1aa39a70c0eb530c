use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordering is urgency: `High` sorts before `Medium` before `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Danger,
    Info,
    Strategy,
    Checklist,
    Discipline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Performance,
    RiskManagement,
    Strategy,
    Checklist,
    Risk,
    Psychology,
    Timing,
    MarketConditions,
    RecentForm,
    Discipline,
    Execution,
    Preparation,
    Success,
}

/// A figure attached to an insight: either a number or a label such as the
/// emotion or session it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(Decimal),
    Label(String),
}

impl From<Decimal> for MetricValue {
    fn from(value: Decimal) -> Self {
        MetricValue::Number(value)
    }
}

impl From<u32> for MetricValue {
    fn from(value: u32) -> Self {
        MetricValue::Number(Decimal::from(value))
    }
}

impl From<usize> for MetricValue {
    fn from(value: usize) -> Self {
        MetricValue::Number(Decimal::from(value as u64))
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Label(value.to_string())
    }
}

/// One diagnostic finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub category: InsightCategory,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub action: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_trades: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, MetricValue>,
}

impl Insight {
    pub fn new(
        kind: InsightKind,
        category: InsightCategory,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category,
            title: title.into(),
            message: message.into(),
            severity,
            action: action.into(),
            related_trades: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn metric(mut self, name: &str, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(name.to_string(), value.into());
        self
    }

    pub fn related<'a>(mut self, ids: impl IntoIterator<Item = &'a str>) -> Self {
        self.related_trades = ids.into_iter().map(str::to_string).collect();
        self
    }
}

/// Stable sort by severity; ties keep emission order.
pub fn sort_by_severity(insights: &mut [Insight]) {
    insights.sort_by_key(|i| i.severity);
}

/// Count of insights per severity level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub total: u32,
}

impl InsightSummary {
    pub fn from_insights(insights: &[Insight]) -> Self {
        let mut summary = Self::default();
        for insight in insights {
            match insight.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary.total = insights.len() as u32;
        summary
    }
}

// ---------------------------------------------------------------------------
// Message formatting
// ---------------------------------------------------------------------------

pub(crate) fn money(amount: Decimal) -> String {
    let rounded = amount.abs().round_dp(2);
    if amount < Decimal::ZERO {
        format!("-${rounded:.2}")
    } else {
        format!("${rounded:.2}")
    }
}

pub(crate) fn pct(value: Decimal) -> String {
    format!("{:.1}%", value.round_dp(1))
}

pub(crate) fn num(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
