//! Post-run performance summary.

use super::run::TrajectoryRecord;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    /// Annualized standard deviation of daily returns.
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    /// Days on which shares actually changed hands.
    pub total_trades: usize,
    pub final_value: f64,
}

impl Metrics {
    pub fn compute(trajectory: &[TrajectoryRecord], initial_cash: f64, risk_free_rate: f64) -> Self {
        let final_value = trajectory
            .last()
            .map(|r| r.portfolio_value)
            .unwrap_or(initial_cash);

        let total_return = if initial_cash > 0.0 {
            (final_value - initial_cash) / initial_cash
        } else {
            0.0
        };

        let trading_days = trajectory.len() as f64;
        let years = trading_days / TRADING_DAYS_PER_YEAR;
        let annualized_return = if years > 0.0 && total_return.is_finite() {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let values: Vec<f64> = std::iter::once(initial_cash)
            .chain(trajectory.iter().map(|r| r.portfolio_value))
            .collect();

        let max_drawdown = compute_drawdown(&values);

        let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
        let (volatility, sharpe_ratio, sortino_ratio) = compute_risk_adjusted(&values, daily_rf);

        let total_trades = trajectory.iter().filter(|r| r.shares_traded != 0).count();

        Metrics {
            total_return,
            annualized_return,
            volatility,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown,
            total_trades,
            final_value,
        }
    }
}

fn compute_drawdown(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut peak = values[0];
    let mut max_dd = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

fn compute_risk_adjusted(values: &[f64], daily_rf: f64) -> (f64, f64, f64) {
    if values.len() < 2 {
        return (0.0, 0.0, 0.0);
    }

    let returns: Vec<f64> = values
        .windows(2)
        .map(|w| {
            let prev = w[0];
            let curr = w[1];
            if prev > 0.0 { (curr - prev) / prev } else { 0.0 }
        })
        .collect();

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;

    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    let volatility = stddev * TRADING_DAYS_PER_YEAR.sqrt();

    let excess_return = mean - daily_rf;

    let sharpe = if stddev > 0.0 {
        (excess_return / stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    let downside: Vec<f64> = returns
        .iter()
        .filter(|&&r| r < daily_rf)
        .map(|&r| (r - daily_rf).powi(2))
        .collect();

    let downside_stddev = if !downside.is_empty() {
        let ds_variance: f64 = downside.iter().sum::<f64>() / n;
        ds_variance.sqrt()
    } else {
        0.0
    };

    let sortino = if downside_stddev > 0.0 {
        (excess_return / downside_stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    (volatility, sharpe, sortino)
}
