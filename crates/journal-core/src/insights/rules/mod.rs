//! Individual insight rules, grouped by concern.

pub mod audit;
pub mod checklist;
pub mod performance;
pub mod psychology;
pub mod recent;
pub mod risk;
pub mod strategy;
pub mod timing;

use crate::journal::Trade;
use crate::types::*;
use rust_decimal::Decimal;

/// Trade count, win count and net P&L over a group of trades.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Tally {
    pub total: usize,
    pub wins: usize,
    pub net_pnl: Money,
}

impl Tally {
    pub fn of<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        let mut tally = Self::default();
        for trade in trades {
            tally.total += 1;
            if trade.is_win() {
                tally.wins += 1;
            }
            tally.net_pnl += trade.net_pnl;
        }
        tally
    }

    pub fn win_rate(&self) -> Percent {
        percent_of(self.wins, self.total)
    }

    pub fn avg_pnl(&self) -> Money {
        if self.total == 0 {
            Decimal::ZERO
        } else {
            self.net_pnl / Decimal::from(self.total as u64)
        }
    }
}
