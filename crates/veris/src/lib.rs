//! VERIS - Valuation Engine for Real-estate Investment Scoring
//!
//! Deterministic investment scoring plus filter-command synchronization
//! for a map-driven property assistant. The assistant's replies carry
//! structured map commands; VERIS validates them, keeps the canonical
//! filter state, fetches matching listings, and projects them into
//! scored map markers.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use veris::models::{FilterState, Property, RiskProfile, VerisConfig};
//! use veris::map::{MapSession, MarkerProjector};
//! use veris::store::{PropertyReader, SqliteProperties};
//! use veris::engine::{investment_memo, score};
//! ```

pub use veris_engine as engine;
pub use veris_map as map;
pub use veris_models as models;
pub use veris_store as store;

use std::sync::Arc;
use std::time::Duration;

use veris_map::MapSession;
use veris_models::config::VerisConfig;
use veris_models::profile::RiskProfile;
use veris_store::{PropertyReader, SqliteProperties};

/// Build a map session over the configured listings database.
pub fn build_session(
    config: &VerisConfig,
    profile: RiskProfile,
) -> Result<MapSession, anyhow::Error> {
    let sqlite = SqliteProperties::open(&config.store.sqlite_path)?;
    let reader = Arc::new(PropertyReader::new(
        sqlite,
        config.store.memory_max_capacity,
        Duration::from_secs(config.store.memory_ttl_seconds),
    ));
    Ok(MapSession::new(reader, profile, config.map.clone()))
}
