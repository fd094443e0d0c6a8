use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level configuration for VERIS.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VerisConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub finance: FinanceConfig,
}

/// Configuration for the property source layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Path to the SQLite listings database (written by `veris load`).
    pub sqlite_path: String,
    /// Maximum number of query results held in the in-memory moka cache.
    pub memory_max_capacity: u64,
    /// TTL in seconds for cached query results.
    pub memory_ttl_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "data/veris_properties.db".to_string(),
            memory_max_capacity: 1_000,
            memory_ttl_seconds: 60,
        }
    }
}

/// Configuration for viewport derivation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Initial map center before any command arrives (Pune).
    pub home_lat: f64,
    pub home_lng: f64,
    pub home_zoom: f64,
    /// Zoom ceiling for auto-fit, so a single marker never over-zooms.
    pub max_fit_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            home_lat: 18.5204,
            home_lng: 73.8567,
            home_zoom: 11.0,
            max_fit_zoom: 14.0,
        }
    }
}

/// Standard financing assumptions for cash-flow figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinanceConfig {
    /// Loan principal as a fraction of price (80% loan, 20% down).
    pub loan_to_value: Decimal,
    pub loan_years: u32,
    pub annual_rate_pct: Decimal,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            loan_to_value: Decimal::new(80, 2),
            loan_years: 20,
            annual_rate_pct: Decimal::new(85, 1),
        }
    }
}
