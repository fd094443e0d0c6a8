use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Categorical investment call derived from score thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Verdict {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "HIGH RISK")]
    HighRisk,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::StrongBuy => "STRONG BUY",
            Verdict::Hold => "HOLD",
            Verdict::HighRisk => "HIGH RISK",
        };
        write!(f, "{s}")
    }
}

/// Sub-scores on the 0-10 scale, as shown in the detail view bars.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    #[serde(rename = "yield")]
    pub yield_score: Decimal,
    #[serde(rename = "growth")]
    pub growth_score: Decimal,
    #[serde(rename = "legal")]
    pub legal_score: Decimal,
}

/// The complete scoring output for a single property.
/// Built fresh on every request; never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    /// 1.0-10.0 inclusive, one decimal place.
    pub score: Decimal,
    pub verdict: Verdict,
    pub breakdown: ScoreBreakdown,
    /// Stable order: litigation, RERA, then risk-tier caution.
    pub warnings: Vec<String>,
}

/// Monthly cash-flow picture under the standard financing assumptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlow {
    /// Gross monthly rent implied by the rental yield.
    pub rent: Decimal,
    /// Monthly amortized loan payment.
    pub payment: Decimal,
    pub maintenance: Decimal,
    /// rent - payment - maintenance. Negative means out-of-pocket.
    pub net: Decimal,
}

/// One point on the five-year value projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthPoint {
    pub year: u32,
    pub projected_value: Decimal,
}

/// The full analysis bundle served to the detail view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvestmentMemo {
    pub property_id: String,
    pub score: ScoreResult,
    pub cash_flow: CashFlow,
    pub projection: Vec<GrowthPoint>,
}
