use clap::Args;
use serde_json::Value;

use journal_core::report::{self, TradeHistoryInput};

use crate::input;

/// Arguments for trade history analytics
#[derive(Args)]
pub struct AnalyticsArgs {
    /// Path to JSON input file ({"trades": [...]})
    #[arg(long)]
    pub input: Option<String>,

    /// YAML or JSON file with analysis thresholds; overrides any inline config
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run_analytics(args: AnalyticsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut history: TradeHistoryInput = input::read_payload(args.input.as_deref(), "analytics")?;
    if let Some(ref path) = args.config {
        history.config = Some(input::file::read_config(path)?);
    }
    let result = report::analyze_history(&history)?;
    Ok(serde_json::to_value(result)?)
}
