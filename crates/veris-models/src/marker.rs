use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::filter::Viewport;
use crate::score::Verdict;

/// A renderable map marker: plain data for any view layer to consume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub id: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    /// Asking price in whole rupees.
    pub price: u64,
    /// Score badge shown on the marker, one decimal place.
    pub score: Decimal,
    pub verdict: Verdict,
}

/// The derived view of the map for one filter snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Projection {
    pub markers: Vec<Marker>,
    /// `None` means "keep the viewport you had" (e.g. empty marker set).
    pub viewport: Option<Viewport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn roundtrip_projection() {
        let projection = Projection {
            markers: vec![Marker {
                id: "PROP_0001".to_string(),
                title: "3BHK Apartment in Baner".to_string(),
                lat: 18.5590,
                lng: 73.7868,
                price: 12_500_000,
                score: dec!(10.0),
                verdict: Verdict::StrongBuy,
            }],
            viewport: Some(Viewport {
                center_lat: 18.5590,
                center_lng: 73.7868,
                zoom: 13.0,
            }),
        };

        let json = serde_json::to_string(&projection).unwrap();
        let deserialized: Projection = serde_json::from_str(&json).unwrap();
        assert_eq!(projection, deserialized);
    }
}
