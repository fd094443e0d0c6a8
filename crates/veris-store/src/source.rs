use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use veris_models::Property;

use crate::error::StoreError;
use crate::memory::MemoryCache;
use crate::query::FilterQuery;
use crate::sqlite::SqliteProperties;

/// Where property result sets come from.
///
/// The map session only knows this trait, so tests can swap in slow or
/// scripted sources without touching SQLite.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch every property matching the query. Implementations must
    /// return [`StoreError::Cancelled`] instead of results once `cancel`
    /// fires; cancelled results must never be applied.
    async fn fetch(
        &self,
        query: &FilterQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Property>, StoreError>;

    /// Look up one property by id.
    async fn get(&self, id: &str) -> Result<Option<Property>, StoreError>;
}

/// Read-through property reader: moka (hot) → SQLite (disk).
///
/// Result sets are cached whole under the query fingerprint; a SQLite
/// hit is promoted to moka for subsequent reads of the same filter.
/// SQLite access is synchronized via `Mutex` since
/// `rusqlite::Connection` is not `Sync`.
pub struct PropertyReader {
    memory: MemoryCache,
    sqlite: Mutex<SqliteProperties>,
}

impl PropertyReader {
    pub fn new(sqlite: SqliteProperties, max_capacity: u64, memory_ttl: Duration) -> Self {
        Self {
            memory: MemoryCache::new(max_capacity, memory_ttl),
            sqlite: Mutex::new(sqlite),
        }
    }

    /// Drop all hot entries, e.g. after a reload of the database.
    pub async fn invalidate(&self) {
        self.memory.invalidate_all().await;
    }

    pub fn hot_cache_size(&self) -> u64 {
        self.memory.entry_count()
    }

    fn with_sqlite<T>(
        &self,
        f: impl FnOnce(&SqliteProperties) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let sqlite = self
            .sqlite
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("SQLite mutex poisoned: {e}")))?;
        f(&sqlite)
    }
}

#[async_trait]
impl PropertySource for PropertyReader {
    async fn fetch(
        &self,
        query: &FilterQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Property>, StoreError> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let key = query.fingerprint();
        if let Some(json) = self.memory.get(&key).await {
            debug!(key, "hot cache hit");
            return Ok(serde_json::from_str(&json)?);
        }

        let properties = self.with_sqlite(|sqlite| sqlite.fetch(query))?;

        // The query may have been superseded while SQLite ran.
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let json = serde_json::to_string(&properties)?;
        self.memory.insert(key, json).await;
        Ok(properties)
    }

    async fn get(&self, id: &str) -> Result<Option<Property>, StoreError> {
        self.with_sqlite(|sqlite| sqlite.get_by_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use veris_models::property::{PropertyType, ReraStatus};

    fn make_property(id: &str, locality: &str) -> Property {
        Property {
            id: id.to_string(),
            title: format!("2BHK Apartment in {locality}"),
            locality: locality.to_string(),
            property_type: PropertyType::Apartment,
            price: 7_500_000,
            bedrooms: 2,
            carpet_area: 900,
            rental_yield: dec!(3.8),
            appreciation: dec!(42),
            litigation: 0,
            rera_status: ReraStatus::Approved,
            maintenance: dec!(2800),
            lat: Some(18.5204),
            lng: Some(73.8567),
            developer: None,
            possession_date: None,
            listed_at: None,
        }
    }

    fn seeded_reader() -> PropertyReader {
        let mut sqlite = SqliteProperties::open_in_memory().unwrap();
        sqlite
            .upsert_batch(&[
                make_property("PROP_0001", "Baner"),
                make_property("PROP_0002", "Kothrud"),
            ])
            .unwrap();
        PropertyReader::new(sqlite, 100, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn read_through_promotes_to_hot_cache() {
        let reader = seeded_reader();
        let cancel = CancellationToken::new();
        let query = FilterQuery {
            locality: Some("Baner".to_string()),
            ..FilterQuery::default()
        };

        let first = reader.fetch(&query, &cancel).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(reader.memory.get(&query.fingerprint()).await.is_some());

        let second = reader.fetch(&query, &cancel).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn cancelled_fetch_yields_no_results() {
        let reader = seeded_reader();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = reader.fetch(&FilterQuery::default(), &cancel).await.unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
    }

    #[tokio::test]
    async fn get_by_id_passthrough() {
        let reader = seeded_reader();
        let property = reader.get("PROP_0002").await.unwrap().unwrap();
        assert_eq!(property.locality, "Kothrud");
        assert!(reader.get("PROP_9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalidate_clears_hot_cache() {
        let reader = seeded_reader();
        let cancel = CancellationToken::new();
        let query = FilterQuery::default();
        reader.fetch(&query, &cancel).await.unwrap();
        assert!(reader.memory.get(&query.fingerprint()).await.is_some());

        reader.invalidate().await;
        assert!(reader.memory.get(&query.fingerprint()).await.is_none());
    }
}
