pub mod error;
pub mod memory;
pub mod query;
pub mod source;
pub mod sqlite;

pub use error::StoreError;
pub use query::FilterQuery;
pub use source::{PropertyReader, PropertySource};
pub use sqlite::SqliteProperties;
