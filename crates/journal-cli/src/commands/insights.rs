use clap::Args;
use serde_json::Value;

use journal_core::report::{self, JournalInput};

use crate::input;

/// Arguments for the insight engine
#[derive(Args)]
pub struct InsightsArgs {
    /// Path to JSON input file (trades, account, strategies, checklists)
    #[arg(long)]
    pub input: Option<String>,

    /// YAML or JSON file with analysis thresholds; overrides any inline config
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run_insights(args: InsightsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut journal: JournalInput = input::read_payload(args.input.as_deref(), "insights")?;
    if let Some(ref path) = args.config {
        journal.config = Some(input::file::read_config(path)?);
    }
    let result = report::analyze_journal(&journal)?;
    Ok(serde_json::to_value(result)?)
}
