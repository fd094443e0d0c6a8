use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use veris_models::property::{Property, PropertyType, ReraStatus};
use veris_models::schema::PROPERTY_TABLE_DDL;

use crate::error::StoreError;
use crate::query::FilterQuery;

const PROPERTY_COLUMNS: &str = "id, title, locality, property_type, price, bedrooms, \
     carpet_area, rental_yield, appreciation, litigation, rera_status, maintenance, \
     lat, lng, developer, possession_date, listed_at";

/// SQLite accessor for the property listings database.
///
/// The database is written by the loader and read by everything else;
/// the serving path opens it read-only.
#[derive(Debug)]
pub struct SqliteProperties {
    conn: Connection,
}

impl SqliteProperties {
    /// Open a read-only connection to the listings database.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Open a writable connection, creating the schema if needed. The
    /// loader uses this; tests do too.
    pub fn open_writable(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(PROPERTY_TABLE_DDL)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database with the schema applied. Writable so
    /// tests can seed data.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(PROPERTY_TABLE_DDL)?;
        Ok(Self { conn })
    }

    /// Fetch all properties matching the server-side filter fields,
    /// ordered by id for stable results.
    pub fn fetch(&self, query: &FilterQuery) -> Result<Vec<Property>, StoreError> {
        let mut sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(locality) = &query.locality {
            clauses.push("locality = ? COLLATE NOCASE");
            params.push(Box::new(locality.clone()));
        }
        if let Some(property_type) = &query.property_type {
            clauses.push("property_type = ? COLLATE NOCASE");
            params.push(Box::new(property_type.clone()));
        }
        if let Some(min_price) = query.min_price {
            clauses.push("price >= ?");
            params.push(Box::new(min_price));
        }
        if let Some(max_price) = query.max_price {
            clauses.push("price <= ?");
            params.push(Box::new(max_price));
        }
        if let Some(bedrooms) = query.bedrooms {
            clauses.push("bedrooms = ?");
            params.push(Box::new(bedrooms));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(
                rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                row_to_property,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Get a single property by id.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Property>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?1"))?;

        match stmt.query_row(rusqlite::params![id], row_to_property) {
            Ok(property) => Ok(Some(property)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    /// Upsert a batch of properties in one transaction. Returns the
    /// number of rows written.
    pub fn upsert_batch(&mut self, properties: &[Property]) -> Result<usize, StoreError> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO properties \
                 (id, title, locality, property_type, price, bedrooms, carpet_area, \
                  rental_yield, appreciation, litigation, rera_status, maintenance, \
                  lat, lng, developer, possession_date, listed_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            )?;
            for p in properties {
                // Out-of-range prices fail the bind rather than wrap.
                stmt.execute(rusqlite::params![
                    p.id,
                    p.title,
                    p.locality,
                    p.property_type.to_string(),
                    p.price,
                    p.bedrooms,
                    p.carpet_area,
                    p.rental_yield.to_string(),
                    p.appreciation.to_string(),
                    p.litigation,
                    p.rera_status.to_string(),
                    p.maintenance.to_string(),
                    p.lat,
                    p.lng,
                    p.developer,
                    p.possession_date,
                    p.listed_at.map(|t| t.to_rfc3339()),
                    now,
                ])?;
            }
        }
        tx.commit()?;
        Ok(properties.len())
    }

    /// Total number of listings in the database.
    pub fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM properties", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn row_to_property(row: &rusqlite::Row<'_>) -> rusqlite::Result<Property> {
    fn decimal(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
        let text: String = row.get(idx)?;
        Decimal::from_str(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    }

    let property_type: String = row.get(3)?;
    let property_type = PropertyType::from_str(&property_type).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;

    let rera_status: String = row.get(10)?;
    // Out-of-vocabulary statuses map to Unknown, matching the wire codec.
    let rera_status = ReraStatus::from_str(&rera_status).unwrap_or(ReraStatus::Unknown);

    let listed_at = match row.get::<_, Option<String>>(16)? {
        Some(text) => Some(
            DateTime::parse_from_rfc3339(&text)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        16,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?,
        ),
        None => None,
    };

    Ok(Property {
        id: row.get(0)?,
        title: row.get(1)?,
        locality: row.get(2)?,
        property_type,
        price: row.get(4)?,
        bedrooms: row.get(5)?,
        carpet_area: row.get(6)?,
        rental_yield: decimal(row, 7)?,
        appreciation: decimal(row, 8)?,
        litigation: row.get(9)?,
        rera_status,
        maintenance: decimal(row, 11)?,
        lat: row.get(12)?,
        lng: row.get(13)?,
        developer: row.get(14)?,
        possession_date: row.get(15)?,
        listed_at,
    })
}
