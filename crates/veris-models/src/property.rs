use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Apartment,
    Villa,
    Plot,
    Commercial,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::Plot => "Plot",
            PropertyType::Commercial => "Commercial",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Apartment" => Ok(PropertyType::Apartment),
            "Villa" => Ok(PropertyType::Villa),
            "Plot" => Ok(PropertyType::Plot),
            "Commercial" => Ok(PropertyType::Commercial),
            other => Err(format!("unknown property type: {other}")),
        }
    }
}

/// RERA registration status of a listing.
///
/// Upstream data occasionally carries statuses outside this set
/// (e.g. "Revoked"); those deserialize to `Unknown`, which zeroes the
/// legal sub-score rather than silently passing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReraStatus {
    Approved,
    Pending,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ReraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReraStatus::Approved => "Approved",
            ReraStatus::Pending => "Pending",
            ReraStatus::Rejected => "Rejected",
            ReraStatus::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ReraStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Approved" => Ok(ReraStatus::Approved),
            "Pending" => Ok(ReraStatus::Pending),
            "Rejected" => Ok(ReraStatus::Rejected),
            _ => Ok(ReraStatus::Unknown),
        }
    }
}

/// Geographic coordinates of a listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// An immutable property record as served by the listing source.
///
/// `lat`/`lng` are only meaningful together; use [`Property::location`]
/// to get the paired coordinates. A record with one half of the pair is
/// treated as having no location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub locality: String,
    pub property_type: PropertyType,
    /// Asking price in whole rupees.
    pub price: u64,
    pub bedrooms: u32,
    pub carpet_area: u32,
    /// Gross annual rental yield as a percentage of price.
    pub rental_yield: Decimal,
    /// Five-year appreciation percentage. May be negative.
    pub appreciation: Decimal,
    /// Count of open legal cases against the project.
    pub litigation: u32,
    pub rera_status: ReraStatus,
    /// Monthly maintenance cost in rupees.
    pub maintenance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possession_date: Option<String>,
    /// When the listing went live, if the source carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_at: Option<DateTime<Utc>>,
}

impl Property {
    /// Paired coordinates, or `None` when either half is missing.
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_property() -> Property {
        Property {
            id: "PROP_0001".to_string(),
            title: "3BHK Apartment in Baner".to_string(),
            locality: "Baner".to_string(),
            property_type: PropertyType::Apartment,
            price: 12_500_000,
            bedrooms: 3,
            carpet_area: 1250,
            rental_yield: dec!(3.6),
            appreciation: dec!(55),
            litigation: 0,
            rera_status: ReraStatus::Approved,
            maintenance: dec!(4375),
            lat: Some(18.5590),
            lng: Some(73.7868),
            developer: Some("Godrej Properties".to_string()),
            possession_date: Some("2027-03-01".to_string()),
            listed_at: Some("2026-01-15T09:30:00Z".parse().unwrap()),
        }
    }

    #[test]
    fn roundtrip_property() {
        let property = sample_property();
        let json = serde_json::to_string(&property).unwrap();
        let deserialized: Property = serde_json::from_str(&json).unwrap();
        assert_eq!(property, deserialized);
    }

    #[test]
    fn location_requires_both_coordinates() {
        let mut property = sample_property();
        assert!(property.location().is_some());

        property.lng = None;
        assert!(property.location().is_none());
    }

    #[test]
    fn property_without_location() {
        let json = r#"{
            "id": "PROP_0002",
            "title": "Residential Plot (2000 sq.ft) - Wagholi",
            "locality": "Wagholi",
            "property_type": "Plot",
            "price": 18000000,
            "bedrooms": 0,
            "carpet_area": 2000,
            "rental_yield": 0,
            "appreciation": 35,
            "litigation": 0,
            "rera_status": "Approved",
            "maintenance": 0
        }"#;

        let property: Property = serde_json::from_str(json).unwrap();
        assert!(property.location().is_none());
        assert_eq!(property.rental_yield, dec!(0));
        assert_eq!(property.listed_at, None);
    }

    #[test]
    fn unknown_rera_status_maps_to_unknown() {
        let status: ReraStatus = serde_json::from_str("\"Revoked\"").unwrap();
        assert_eq!(status, ReraStatus::Unknown);
    }

    #[test]
    fn numeric_fields_accept_json_numbers() {
        // The upstream dataset emits yields/appreciation as plain numbers.
        let json = r#"{"id":"PROP_0003","title":"Commercial Shop (800 sq.ft) - Aundh",
            "locality":"Aundh","property_type":"Commercial","price":9600000,
            "bedrooms":0,"carpet_area":800,"rental_yield":6.25,"appreciation":50,
            "litigation":1,"rera_status":"Pending","maintenance":2800,
            "lat":18.5590,"lng":73.8078}"#;

        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.rental_yield, dec!(6.25));
        assert_eq!(property.litigation, 1);
        assert_eq!(property.rera_status, ReraStatus::Pending);
        assert!(property.location().is_some());
    }
}
