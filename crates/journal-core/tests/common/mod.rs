#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use journal_core::journal::{Account, Outcome, Trade};
use rust_decimal::Decimal;

/// Closed trade entered `day` days after 2024-01-02 and exited two hours
/// later. The outcome follows the sign of `net`; gross equals net.
pub fn closed(id: &str, day: i64, net: Decimal) -> Trade {
    let outcome = if net > Decimal::ZERO {
        Outcome::Win
    } else if net < Decimal::ZERO {
        Outcome::Loss
    } else {
        Outcome::Breakeven
    };
    let entry = Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap() + Duration::days(day);
    serde_json::from_value(serde_json::json!({
        "id": id,
        "account_id": "acc-1",
        "symbol": "NQ",
        "direction": "long",
        "entry_price": "17000",
        "entry_date": entry,
        "exit_date": entry + Duration::hours(2),
        "status": "closed",
        "outcome": outcome,
        "gross_pnl": net.to_string(),
        "net_pnl": net.to_string(),
    }))
    .unwrap()
}

pub fn open(id: &str, day: i64) -> Trade {
    let mut t = closed(id, day, Decimal::ZERO);
    t.status = journal_core::journal::TradeStatus::Open;
    t.outcome = Outcome::Pending;
    t.exit_date = None;
    t
}

/// One closed trade per day, in order.
pub fn series(nets: &[Decimal]) -> Vec<Trade> {
    nets.iter()
        .enumerate()
        .map(|(i, &net)| closed(&format!("t{i}"), i as i64, net))
        .collect()
}

pub fn account() -> Account {
    serde_json::from_value(serde_json::json!({
        "id": "acc-1",
        "name": "Futures",
        "balance": "25000",
        "invested_amount": "25000",
    }))
    .unwrap()
}
