//! Portfolio state and the daily decision application.
//!
//! Long-only, single asset. `apply_decision` is a pure function over the
//! prior state: it marks the position to the day's execution price, sizes
//! the trade per the configured policy, charges the transaction fee, and
//! returns the new state plus the trade delta. Persisting the outcome is
//! the caller's job.

use serde::{Deserialize, Serialize};

use super::decision::{Action, Decision};

/// Rule converting a BUY/SELL signal into a share quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingPolicy {
    /// Trade exactly one unit per signal.
    #[default]
    OneShare,
    /// Invest all available cash, or liquidate all shares.
    AllIn,
}

impl SizingPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "one_share" => Some(SizingPolicy::OneShare),
            "all_in" => Some(SizingPolicy::AllIn),
            _ => None,
        }
    }
}

impl std::fmt::Display for SizingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SizingPolicy::OneShare => "one_share",
            SizingPolicy::AllIn => "all_in",
        };
        write!(f, "{s}")
    }
}

/// Cash, shares, and the price they were last marked at.
///
/// Invariant: `cash` and `shares_held` are never negative. The portfolio
/// value is always derived from the components, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares_held: i64,
    pub last_price: f64,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            shares_held: 0,
            last_price: 0.0,
        }
    }

    /// cash + shares_held × last_price
    pub fn portfolio_value(&self) -> f64 {
        self.cash + self.shares_held as f64 * self.last_price
    }

    /// Fraction of portfolio value held in shares, 0 when the value is 0.
    pub fn invested_fraction(&self) -> f64 {
        let value = self.portfolio_value();
        if value <= 0.0 {
            0.0
        } else {
            (self.shares_held as f64 * self.last_price) / value
        }
    }
}

/// Result of applying one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOutcome {
    pub state: PortfolioState,
    /// Positive for buys, negative for sells, 0 for no trade.
    pub shares_traded: i64,
    pub transaction_cost: f64,
}

impl TradeOutcome {
    fn no_trade(state: PortfolioState) -> Self {
        Self {
            state,
            shares_traded: 0,
            transaction_cost: 0.0,
        }
    }
}

/// Apply one validated decision at the day's execution price.
///
/// - The returned state carries `last_price = execution_price` whether or
///   not a trade happens (mark to market).
/// - BUY trades only when `target_position` exceeds the invested fraction
///   at the execution price; sizing is then entirely the policy's.
/// - SELL ignores the target and liquidates per the policy, clamped to the
///   shares held.
/// - A buy whose notional + fee exceeds cash is a no-op, not an error.
/// - A non-positive or non-finite price leaves the state untouched,
///   including the mark.
pub fn apply_decision(
    state: &PortfolioState,
    decision: &Decision,
    execution_price: f64,
    transaction_cost_rate: f64,
    sizing: SizingPolicy,
) -> TradeOutcome {
    if !execution_price.is_finite() || execution_price <= 0.0 {
        return TradeOutcome::no_trade(state.clone());
    }

    let mut marked = PortfolioState {
        cash: state.cash,
        shares_held: state.shares_held,
        last_price: execution_price,
    };

    match decision.action {
        Action::Hold => TradeOutcome::no_trade(marked),
        Action::Buy => {
            if decision.target_position <= marked.invested_fraction() {
                return TradeOutcome::no_trade(marked);
            }

            let quantity = match sizing {
                SizingPolicy::OneShare => 1,
                SizingPolicy::AllIn => {
                    (marked.cash / (execution_price * (1.0 + transaction_cost_rate))).floor() as i64
                }
            };
            if quantity <= 0 {
                return TradeOutcome::no_trade(marked);
            }

            let notional = quantity as f64 * execution_price;
            let fee = notional * transaction_cost_rate;
            let total = notional + fee;
            if total > marked.cash {
                return TradeOutcome::no_trade(marked);
            }

            marked.cash -= total;
            marked.shares_held += quantity;
            TradeOutcome {
                state: marked,
                shares_traded: quantity,
                transaction_cost: fee,
            }
        }
        Action::Sell => {
            let quantity = match sizing {
                SizingPolicy::OneShare => marked.shares_held.min(1),
                SizingPolicy::AllIn => marked.shares_held,
            };
            if quantity <= 0 {
                return TradeOutcome::no_trade(marked);
            }

            let notional = quantity as f64 * execution_price;
            let fee = notional * transaction_cost_rate;
            marked.cash += notional - fee;
            marked.shares_held -= quantity;
            TradeOutcome {
                state: marked,
                shares_traded: -quantity,
                transaction_cost: fee,
            }
        }
    }
}
