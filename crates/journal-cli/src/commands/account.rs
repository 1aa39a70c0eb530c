use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use journal_core::report::{self, AccountPnlInput};

use crate::input;

/// Arguments for account P&L
#[derive(Args)]
pub struct AccountPnlArgs {
    /// Path to JSON input file ({"account": {...}, "trades": [...]})
    #[arg(long)]
    pub input: Option<String>,

    /// Starting balance; overrides the account's initial_balance
    #[arg(long)]
    pub initial_balance: Option<Decimal>,
}

pub fn run_account_pnl(args: AccountPnlArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut pnl_input: AccountPnlInput = input::read_payload(args.input.as_deref(), "account P&L")?;
    if let Some(balance) = args.initial_balance {
        pnl_input.account.initial_balance = Some(balance);
    }
    let result = report::account_pnl(&pnl_input)?;
    Ok(serde_json::to_value(result)?)
}
