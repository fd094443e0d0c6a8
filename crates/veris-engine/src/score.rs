use rust_decimal::{Decimal, RoundingStrategy};

use veris_models::config::FinanceConfig;
use veris_models::profile::{RiskProfile, RiskTier};
use veris_models::property::{Property, ReraStatus};
use veris_models::score::{InvestmentMemo, ScoreBreakdown, ScoreResult, Verdict};

use crate::error::EngineError;
use crate::finance::{growth_projection, monthly_cash_flow};

/// Weighted investment score for a property, 1.0-10.0.
///
/// Three binary sub-scores (yield, growth, legal) blend into a weighted
/// composite; growth carries the highest weight because capital
/// appreciation dominates the headline call. The composite is rescaled
/// from 0-10 onto the displayed 1-10 band and rounded to one decimal.
pub fn score(property: &Property, profile: &RiskProfile) -> Result<ScoreResult, EngineError> {
    if property.rental_yield < Decimal::ZERO {
        return Err(EngineError::InvalidProperty {
            id: property.id.clone(),
            reason: format!("negative rental yield {}", property.rental_yield),
        });
    }
    if property.appreciation < Decimal::ZERO {
        return Err(EngineError::InvalidProperty {
            id: property.id.clone(),
            reason: format!("negative appreciation {}", property.appreciation),
        });
    }

    let five = Decimal::from(5);

    let yield_score = if property.rental_yield > Decimal::new(35, 1) {
        Decimal::TEN
    } else {
        five
    };
    let growth_score = if property.appreciation > Decimal::from(45) {
        Decimal::TEN
    } else {
        five
    };
    let legal_score =
        if property.litigation == 0 && property.rera_status == ReraStatus::Approved {
            Decimal::TEN
        } else {
            Decimal::ZERO
        };

    let composite = yield_score * Decimal::new(3, 1)
        + growth_score * Decimal::new(4, 1)
        + legal_score * Decimal::new(3, 1);

    let score = (Decimal::ONE + composite * Decimal::new(9, 1))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ONE, Decimal::TEN);

    let verdict = if score >= Decimal::from(7) {
        Verdict::StrongBuy
    } else if score >= Decimal::from(4) {
        Verdict::Hold
    } else {
        Verdict::HighRisk
    };

    // Warning order is part of the contract: litigation, RERA, caution.
    let mut warnings = Vec::new();
    if property.litigation > 0 {
        warnings.push(format!("{} open legal case(s)", property.litigation));
    }
    if property.rera_status != ReraStatus::Approved {
        warnings.push(format!("RERA status: {}", property.rera_status));
    }
    if profile.tier == RiskTier::Conservative && score < Decimal::from(7) {
        warnings.push(
            "Score below 7 may not suit a Conservative risk profile".to_string(),
        );
    }

    Ok(ScoreResult {
        score,
        verdict,
        breakdown: ScoreBreakdown {
            yield_score,
            growth_score,
            legal_score,
        },
        warnings,
    })
}

/// The full analysis bundle for the detail view: score, monthly cash
/// flow under the standard financing assumptions, and the five-year
/// value projection.
pub fn investment_memo(
    property: &Property,
    profile: &RiskProfile,
    finance: &FinanceConfig,
) -> Result<InvestmentMemo, EngineError> {
    Ok(InvestmentMemo {
        property_id: property.id.clone(),
        score: score(property, profile)?,
        cash_flow: monthly_cash_flow(property, finance)?,
        projection: growth_projection(property),
    })
}
