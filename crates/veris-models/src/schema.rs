/// The SQLite table the property loader writes and the store reads.
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS properties (
///     id              TEXT PRIMARY KEY,
///     title           TEXT NOT NULL,
///     locality        TEXT NOT NULL,
///     property_type   TEXT NOT NULL,
///     price           INTEGER NOT NULL,
///     bedrooms        INTEGER NOT NULL,
///     carpet_area     INTEGER NOT NULL,
///     rental_yield    TEXT NOT NULL,
///     appreciation    TEXT NOT NULL,
///     litigation      INTEGER NOT NULL,
///     rera_status     TEXT NOT NULL,
///     maintenance     TEXT NOT NULL,
///     lat             REAL,
///     lng             REAL,
///     developer       TEXT,
///     possession_date TEXT,
///     listed_at       TEXT,
///     updated_at      TEXT NOT NULL
/// );
/// ```
///
/// Decimal columns (`rental_yield`, `appreciation`, `maintenance`) are
/// stored as TEXT so values round-trip exactly.
pub const PROPERTY_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS properties (
    id              TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    locality        TEXT NOT NULL,
    property_type   TEXT NOT NULL,
    price           INTEGER NOT NULL,
    bedrooms        INTEGER NOT NULL,
    carpet_area     INTEGER NOT NULL,
    rental_yield    TEXT NOT NULL,
    appreciation    TEXT NOT NULL,
    litigation      INTEGER NOT NULL,
    rera_status     TEXT NOT NULL,
    maintenance     TEXT NOT NULL,
    lat             REAL,
    lng             REAL,
    developer       TEXT,
    possession_date TEXT,
    listed_at       TEXT,
    updated_at      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_properties_locality ON properties(locality);
CREATE INDEX IF NOT EXISTS idx_properties_type ON properties(property_type);
CREATE INDEX IF NOT EXISTS idx_properties_price ON properties(price);
";
