use clap::Args;
use serde_json::Value;

use journal_core::report::{self, TradeReviewInput};

use crate::input;

/// Arguments for a single trade review
#[derive(Args)]
pub struct ReviewArgs {
    /// Path to JSON input file (trade_id, trades, strategies, checklists)
    #[arg(long)]
    pub input: Option<String>,

    /// Trade to review; overrides `trade_id` in the input
    #[arg(long)]
    pub trade_id: Option<String>,
}

pub fn run_review(args: ReviewArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut review: TradeReviewInput = input::read_payload(args.input.as_deref(), "trade review")?;
    if let Some(id) = args.trade_id {
        review.trade_id = id;
    }
    let result = report::review_trade(&review)?;
    Ok(serde_json::to_value(result)?)
}
