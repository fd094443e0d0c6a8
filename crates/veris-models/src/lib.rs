pub mod config;
pub mod filter;
pub mod marker;
pub mod profile;
pub mod property;
pub mod schema;
pub mod score;

pub use config::{FinanceConfig, MapConfig, StoreConfig, VerisConfig};
pub use filter::{FilterPatch, FilterState, Viewport};
pub use marker::{Marker, Projection};
pub use profile::{RiskProfile, RiskTier};
pub use property::{GeoPoint, Property, PropertyType, ReraStatus};
pub use score::{
    CashFlow, GrowthPoint, InvestmentMemo, ScoreBreakdown, ScoreResult, Verdict,
};
