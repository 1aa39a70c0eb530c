use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::records::{Direction, Outcome, Trade};
use crate::types::*;

// ---------------------------------------------------------------------------
// P&L
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlBreakdown {
    pub gross_pnl: Money,
    pub total_costs: Money,
    pub net_pnl: Money,
    /// Price move relative to entry, in percent
    pub pnl_percentage: Percent,
}

/// Gross and net P&L for a fully closed position.
///
/// Slippage is quoted per unit and scaled by `quantity * lot_size`.
#[allow(clippy::too_many_arguments)]
pub fn calculate_pnl(
    direction: Direction,
    entry_price: Money,
    exit_price: Money,
    lot_size: Decimal,
    quantity: Decimal,
    fees: Money,
    commissions: Money,
    slippage: Money,
) -> PnlBreakdown {
    let price_diff = match direction {
        Direction::Long => exit_price - entry_price,
        Direction::Short => entry_price - exit_price,
    };
    let gross_pnl = price_diff * quantity * lot_size;
    let total_costs = fees + commissions + slippage * quantity * lot_size;
    PnlBreakdown {
        gross_pnl,
        total_costs,
        net_pnl: gross_pnl - total_costs,
        pnl_percentage: ratio_or_zero(price_diff, entry_price) * Decimal::ONE_HUNDRED,
    }
}

/// Recompute a stored trade's net P&L from its gross P&L and cost fields.
pub fn expected_net_pnl(trade: &Trade) -> Money {
    trade.gross_pnl - trade.total_costs()
}

// ---------------------------------------------------------------------------
// Risk : reward
// ---------------------------------------------------------------------------

fn risk_distance(entry_price: Money, stop_loss: Money, direction: Direction) -> Money {
    match direction {
        Direction::Long => entry_price - stop_loss,
        Direction::Short => stop_loss - entry_price,
    }
}

/// Planned reward / risk from the entry, stop and target. None if the stop
/// sits on the entry price.
pub fn planned_risk_reward(
    entry_price: Money,
    stop_loss: Money,
    take_profit: Money,
    direction: Direction,
) -> Option<Rate> {
    let risk = risk_distance(entry_price, stop_loss, direction);
    if risk.is_zero() {
        return None;
    }
    let reward = match direction {
        Direction::Long => take_profit - entry_price,
        Direction::Short => entry_price - take_profit,
    };
    Some(reward / risk)
}

/// Realised reward / risk at exit; zero when the risk distance is zero.
pub fn realized_risk_reward(
    entry_price: Money,
    exit_price: Money,
    stop_loss: Money,
    direction: Direction,
) -> Rate {
    let risk = risk_distance(entry_price, stop_loss, direction);
    let reward = match direction {
        Direction::Long => exit_price - entry_price,
        Direction::Short => entry_price - exit_price,
    };
    ratio_or_zero(reward, risk)
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Classify a net P&L. Anything within `breakeven_threshold` of zero is a
/// breakeven.
pub fn determine_outcome(net_pnl: Money, breakeven_threshold: Money) -> Outcome {
    if net_pnl.abs() <= breakeven_threshold {
        Outcome::Breakeven
    } else if net_pnl > Decimal::ZERO {
        Outcome::Win
    } else {
        Outcome::Loss
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Σ net P&L over the trades that belong to `account_id`.
///
/// Net P&L is used throughout; cost fields are never double counted.
pub fn account_total_pnl(account_id: &str, trades: &[Trade]) -> Money {
    trades
        .iter()
        .filter(|t| t.account_id == account_id)
        .map(|t| t.net_pnl)
        .sum()
}

/// Current balance: starting balance plus the account's total net P&L.
pub fn account_balance(initial_balance: Money, account_id: &str, trades: &[Trade]) -> Money {
    initial_balance + account_total_pnl(account_id, trades)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_long_pnl_with_costs() {
        // (1.1050 - 1.1000) * 2 * 100000 = 1000 gross
        // costs = 5 + 2 + 0.00001 * 2 * 100000 = 9
        let out = calculate_pnl(
            Direction::Long,
            dec!(1.1000),
            dec!(1.1050),
            dec!(100000),
            dec!(2),
            dec!(5),
            dec!(2),
            dec!(0.00001),
        );
        assert_eq!(out.gross_pnl, dec!(1000));
        assert_eq!(out.total_costs, dec!(9));
        assert_eq!(out.net_pnl, dec!(991));
    }

    #[test]
    fn test_short_pnl_sign() {
        let out = calculate_pnl(
            Direction::Short,
            dec!(100),
            dec!(110),
            dec!(1),
            dec!(10),
            dec!(0),
            dec!(0),
            dec!(0),
        );
        assert_eq!(out.gross_pnl, dec!(-100));
        assert_eq!(out.pnl_percentage, dec!(-10));
    }

    #[test]
    fn test_zero_entry_price_percentage_guarded() {
        let out = calculate_pnl(
            Direction::Long,
            dec!(0),
            dec!(5),
            dec!(1),
            dec!(1),
            dec!(0),
            dec!(0),
            dec!(0),
        );
        assert_eq!(out.pnl_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_planned_risk_reward_long_and_short() {
        assert_eq!(
            planned_risk_reward(dec!(100), dec!(95), dec!(110), Direction::Long),
            Some(dec!(2))
        );
        assert_eq!(
            planned_risk_reward(dec!(100), dec!(105), dec!(85), Direction::Short),
            Some(dec!(3))
        );
        assert!(planned_risk_reward(dec!(100), dec!(100), dec!(110), Direction::Long).is_none());
    }

    #[test]
    fn test_realized_risk_reward() {
        assert_eq!(
            realized_risk_reward(dec!(100), dec!(107.5), dec!(95), Direction::Long),
            dec!(1.5)
        );
        assert_eq!(
            realized_risk_reward(dec!(100), dec!(107.5), dec!(100), Direction::Long),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_determine_outcome_threshold() {
        assert_eq!(determine_outcome(dec!(0.4), dec!(0.5)), Outcome::Breakeven);
        assert_eq!(determine_outcome(dec!(-0.5), dec!(0.5)), Outcome::Breakeven);
        assert_eq!(determine_outcome(dec!(0.51), dec!(0.5)), Outcome::Win);
        assert_eq!(determine_outcome(dec!(-3), dec!(0)), Outcome::Loss);
        assert_eq!(determine_outcome(dec!(0), dec!(0)), Outcome::Breakeven);
    }
}
