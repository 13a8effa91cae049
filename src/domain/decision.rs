//! Trading decisions and the validation boundary.
//!
//! Providers return a [`RawDecision`] that is never trusted: [`validate`]
//! either produces a well-formed [`Decision`] or reports why the payload is
//! unusable, and the runner downgrades bad payloads to an annotated HOLD.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Some(Action::Buy),
            "SELL" => Some(Action::Sell),
            "HOLD" => Some(Action::Hold),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        };
        write!(f, "{s}")
    }
}

/// Unvalidated decision payload as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDecision {
    pub action: String,
    pub target_position: f64,
    pub justification: String,
}

/// A validated decision. `target_position` is a fraction of portfolio value
/// in [0, 1]: 0 means flat, 1 means fully invested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub target_position: f64,
    pub justification: String,
}

impl Decision {
    pub fn hold(justification: impl Into<String>) -> Self {
        Self {
            action: Action::Hold,
            target_position: 0.0,
            justification: justification.into(),
        }
    }
}

/// Validate a provider payload. Returns the reason on failure; the caller
/// decides the fallback.
pub fn validate(raw: &RawDecision) -> Result<Decision, String> {
    let action = Action::parse(&raw.action)
        .ok_or_else(|| format!("unknown action {:?}", raw.action))?;

    if !raw.target_position.is_finite() {
        return Err(format!(
            "target_position {} is not finite",
            raw.target_position
        ));
    }
    if !(0.0..=1.0).contains(&raw.target_position) {
        return Err(format!(
            "target_position {} outside [0, 1]",
            raw.target_position
        ));
    }

    Ok(Decision {
        action,
        target_position: raw.target_position,
        justification: raw.justification.clone(),
    })
}
