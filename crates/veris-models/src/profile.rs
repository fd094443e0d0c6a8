use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Investor risk appetite. Drives warning copy only; the score formula
/// itself is tier-independent so results stay reproducible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskTier {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTier {
    /// Map the 1-10 onboarding slider onto a tier.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 7 => RiskTier::Aggressive,
            s if s >= 4 => RiskTier::Moderate,
            _ => RiskTier::Conservative,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::Conservative => "Conservative",
            RiskTier::Moderate => "Moderate",
            RiskTier::Aggressive => "Aggressive",
        };
        write!(f, "{s}")
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskTier::Conservative),
            "moderate" => Ok(RiskTier::Moderate),
            "aggressive" => Ok(RiskTier::Aggressive),
            other => Err(format!("unrecognized risk tier: {other}")),
        }
    }
}

/// The user profile handed in alongside score and chat requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskProfile {
    /// Accepts the legacy `risk` field name from stored profiles.
    #[serde(alias = "risk")]
    pub tier: RiskTier,
    /// 1-10 slider value, kept for display only.
    #[serde(default, alias = "riskScore", skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u8>,
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self {
            tier: RiskTier::Moderate,
            risk_score: None,
        }
    }
}
