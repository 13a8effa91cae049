//! Decision provider port trait.

use crate::domain::decision::RawDecision;
use crate::domain::error::TradesimError;
use crate::domain::indicators::IndicatorReport;
use crate::domain::portfolio::PortfolioState;

pub trait DecisionPort {
    /// Produces a raw decision from the day's indicator report and the
    /// current portfolio state. The output is untrusted: the runner
    /// validates it and falls back to HOLD when it is malformed.
    fn get_decision(
        &self,
        report: &IndicatorReport,
        state: &PortfolioState,
    ) -> Result<RawDecision, TradesimError>;
}
