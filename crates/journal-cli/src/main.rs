mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::account::AccountPnlArgs;
use commands::analytics::AnalyticsArgs;
use commands::insights::InsightsArgs;
use commands::review::ReviewArgs;

/// Trading journal analytics and insights
#[derive(Parser)]
#[command(
    name = "tjournal",
    version,
    about = "Trading journal analytics and insights",
    long_about = "A CLI over a trading journal with decimal precision. Computes performance \
                  metrics from a trade history, runs the threshold-based insight rules, \
                  reviews and scores individual trades, and totals account P&L. \
                  Input is JSON from --input or stdin. Set RUST_LOG for diagnostics."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Performance metrics over a trade history
    Analytics(AnalyticsArgs),
    /// Metrics plus prioritised insights for a journal
    Insights(InsightsArgs),
    /// Score and review a single trade
    ReviewTrade(ReviewArgs),
    /// Net P&L total and balance for an account
    AccountPnl(AccountPnlArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analytics(args) => commands::analytics::run_analytics(args),
        Commands::Insights(args) => commands::insights::run_insights(args),
        Commands::ReviewTrade(args) => commands::review::run_review(args),
        Commands::AccountPnl(args) => commands::account::run_account_pnl(args),
        Commands::Version => {
            println!("tjournal {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
