use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use veris_models::config::FinanceConfig;
use veris_models::property::Property;
use veris_models::score::{CashFlow, GrowthPoint};

use crate::error::EngineError;

/// Years covered by the value projection series.
const PROJECTION_YEARS: u32 = 5;

/// Standard fixed-rate amortization, rounded to the whole rupee.
///
/// `payment = P * r * (1+r)^n / ((1+r)^n - 1)` with the monthly rate
/// `r = annual_rate_pct / 12 / 100` and `n = years * 12`. A zero rate
/// short-circuits to straight division.
pub fn amortized_payment(
    principal: Decimal,
    annual_rate_pct: Decimal,
    years: u32,
) -> Result<Decimal, EngineError> {
    if principal <= Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "principal must be positive, got {principal}"
        )));
    }
    if years == 0 {
        return Err(EngineError::InvalidInput(
            "loan term must be at least one year".to_string(),
        ));
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "interest rate must be non-negative, got {annual_rate_pct}"
        )));
    }

    let months = years * 12;
    if annual_rate_pct.is_zero() {
        let payment = principal / Decimal::from(months);
        return Ok(payment.round());
    }

    // The compounding exponent is computed in f64; the result is rounded
    // to a whole rupee so repeated calls agree exactly.
    let p = principal
        .to_f64()
        .ok_or_else(|| EngineError::InvalidInput("principal out of range".to_string()))?;
    let rate = annual_rate_pct
        .to_f64()
        .ok_or_else(|| EngineError::InvalidInput("rate out of range".to_string()))?;
    let r = rate / 12.0 / 100.0;
    let factor = (1.0 + r).powi(months as i32);
    let payment = p * r * factor / (factor - 1.0);

    Decimal::from_f64(payment.round())
        .ok_or_else(|| EngineError::InvalidInput("payment out of range".to_string()))
}

/// Monthly cash-flow picture for a property under the given financing
/// assumptions: gross rent in, loan payment and maintenance out.
pub fn monthly_cash_flow(
    property: &Property,
    finance: &FinanceConfig,
) -> Result<CashFlow, EngineError> {
    if property.rental_yield < Decimal::ZERO {
        return Err(EngineError::InvalidProperty {
            id: property.id.clone(),
            reason: format!("negative rental yield {}", property.rental_yield),
        });
    }

    let price = Decimal::from(property.price);
    let rent = (price * property.rental_yield / Decimal::ONE_HUNDRED / Decimal::from(12))
        .round_dp(2);

    let principal = price * finance.loan_to_value;
    let payment = amortized_payment(principal, finance.annual_rate_pct, finance.loan_years)?;

    Ok(CashFlow {
        rent,
        payment,
        maintenance: property.maintenance,
        net: rent - payment - property.maintenance,
    })
}

/// Five-year projected value series at the property's appreciation rate.
///
/// Year 0 is the asking price; each following year compounds by
/// `appreciation / 1000` (the headline five-year percentage spread over
/// the series). Deterministic; the presentational jitter the original
/// UI added is intentionally absent.
pub fn growth_projection(property: &Property) -> Vec<GrowthPoint> {
    let growth = Decimal::ONE + property.appreciation / Decimal::from(1_000);
    let mut value = Decimal::from(property.price);
    let mut series = Vec::with_capacity(PROJECTION_YEARS as usize + 1);

    for year in 0..=PROJECTION_YEARS {
        series.push(GrowthPoint {
            year,
            projected_value: value.round(),
        });
        value *= growth;
    }

    series
}
