//! Indicator access port trait.

use crate::domain::error::TradesimError;
use crate::domain::indicators::IndicatorReport;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub trait IndicatorPort {
    /// Builds the indicator report for a ticker as of a given date, using
    /// only information available on or before that date. Indicators the
    /// source cannot produce stay absent in the report rather than failing
    /// the call.
    fn get_indicators(
        &self,
        ticker: &str,
        as_of: NaiveDate,
    ) -> Result<IndicatorReport, TradesimError>;

    /// Second attempt at indicators the first pass left absent. Returns
    /// values only for names it could recover; callers merge these into the
    /// report without overwriting anything already present.
    fn reflect(
        &self,
        ticker: &str,
        as_of: NaiveDate,
        missing: &[String],
    ) -> Result<BTreeMap<String, f64>, TradesimError>;
}
