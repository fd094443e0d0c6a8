use veris_models::FilterState;

/// The server-side slice of a filter state.
///
/// Only the fields with SQL counterparts go into the query; score,
/// litigation, RERA, id allow-lists and the viewport are applied after
/// the rows come back, so two states that differ only in those fields
/// share one fingerprint and one cached result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterQuery {
    pub locality: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub bedrooms: Option<u32>,
}

impl FilterQuery {
    pub fn from_state(state: &FilterState) -> Self {
        Self {
            locality: state.locality.clone(),
            property_type: state.property_type.clone(),
            min_price: state.min_price,
            max_price: state.max_price,
            bedrooms: state.bedrooms,
        }
    }

    /// Stable cache key for this query.
    pub fn fingerprint(&self) -> String {
        fn field<T: std::fmt::Display>(value: &Option<T>) -> String {
            match value {
                Some(v) => v.to_string(),
                None => "*".to_string(),
            }
        }

        format!(
            "q:locality={}|type={}|min_price={}|max_price={}|bedrooms={}",
            field(&self.locality),
            field(&self.property_type),
            field(&self.min_price),
            field(&self.max_price),
            field(&self.bedrooms),
        )
    }
}
