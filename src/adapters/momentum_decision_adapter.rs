//! Momentum decision adapter.
//!
//! Deterministic decision provider: scores the ticker by total return over
//! recent volatility and maps the score to BUY, SELL, or HOLD. Stands in
//! for an external decision service in offline runs and tests.

use crate::domain::decision::RawDecision;
use crate::domain::error::TradesimError;
use crate::domain::indicators::{self, IndicatorReport};
use crate::domain::portfolio::PortfolioState;
use crate::ports::config_port::ConfigPort;
use crate::ports::decision_port::DecisionPort;

pub struct MomentumDecisionAdapter {
    buy_threshold: f64,
    sell_threshold: f64,
}

impl MomentumDecisionAdapter {
    pub fn new(buy_threshold: f64, sell_threshold: f64) -> Self {
        Self {
            buy_threshold,
            sell_threshold,
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Self {
        Self::new(
            config.get_double("decision", "buy_threshold", 0.25),
            config.get_double("decision", "sell_threshold", -0.25),
        )
    }

    fn hold(state: &PortfolioState, justification: String) -> RawDecision {
        RawDecision {
            action: "HOLD".to_string(),
            target_position: state.invested_fraction(),
            justification,
        }
    }
}

impl DecisionPort for MomentumDecisionAdapter {
    fn get_decision(
        &self,
        report: &IndicatorReport,
        state: &PortfolioState,
    ) -> Result<RawDecision, TradesimError> {
        let total_return = report.get(indicators::TOTAL_RETURN);
        let volatility = report.get(indicators::VOLATILITY);

        let (ret, vol) = match (total_return, volatility) {
            (Some(r), Some(v)) => (r, v),
            _ => {
                return Ok(Self::hold(
                    state,
                    "insufficient indicators for momentum score, holding".to_string(),
                ));
            }
        };

        // Flat series has zero volatility; score on the raw return then.
        let score = ret / if vol > 0.0 { vol } else { 1.0 };

        if !score.is_finite() {
            return Ok(Self::hold(
                state,
                "momentum score is not finite, holding".to_string(),
            ));
        }

        let decision = if score >= self.buy_threshold {
            RawDecision {
                action: "BUY".to_string(),
                target_position: 1.0,
                justification: format!(
                    "momentum score {:.4} at or above buy threshold {}",
                    score, self.buy_threshold
                ),
            }
        } else if score <= self.sell_threshold {
            RawDecision {
                action: "SELL".to_string(),
                target_position: 0.0,
                justification: format!(
                    "momentum score {:.4} at or below sell threshold {}",
                    score, self.sell_threshold
                ),
            }
        } else {
            Self::hold(
                state,
                format!("momentum score {:.4} inside hold band", score),
            )
        };

        Ok(decision)
    }
}
