use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::property::ReraStatus;

/// An explicit map viewport. The three components only make sense
/// together, so a partially-specified viewport is unrepresentable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: f64,
}

/// The canonical filter state for the map.
///
/// Every field defaults to unset (`None`), which is distinct from a
/// legitimate zero or empty value (`bedrooms: Some(0)` means "zero
/// bedrooms", not "no bedroom filter"). Snapshots are plain values;
/// mutation always goes through [`FilterState::merge`] on a fresh clone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterState {
    pub locality: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub bedrooms: Option<u32>,
    pub min_score: Option<Decimal>,
    pub litigation: Option<u32>,
    pub rera_status: Option<ReraStatus>,
    /// Allow-list of property identifiers. Intersects with the other
    /// filters; an empty list matches nothing.
    pub ids: Option<Vec<String>>,
    pub viewport: Option<Viewport>,
}

impl FilterState {
    /// True iff any field is set. Drives the "filters active" badge.
    pub fn is_active(&self) -> bool {
        self != &FilterState::default()
    }

    /// Produce a new state with every field present in `patch`
    /// overwritten (explicit null clears) and absent fields untouched.
    pub fn merge(&self, patch: &FilterPatch) -> FilterState {
        let mut next = self.clone();
        if let Some(v) = &patch.locality {
            next.locality = v.clone();
        }
        if let Some(v) = &patch.property_type {
            next.property_type = v.clone();
        }
        if let Some(v) = patch.min_price {
            next.min_price = v;
        }
        if let Some(v) = patch.max_price {
            next.max_price = v;
        }
        if let Some(v) = patch.bedrooms {
            next.bedrooms = v;
        }
        if let Some(v) = patch.min_score {
            next.min_score = v;
        }
        if let Some(v) = patch.litigation {
            next.litigation = v;
        }
        if let Some(v) = patch.rera_status {
            next.rera_status = v;
        }
        if let Some(v) = &patch.ids {
            next.ids = v.clone();
        }
        if let Some(v) = patch.viewport {
            next.viewport = Some(v);
        }
        next
    }
}

/// A field-presence-aware partial update to [`FilterState`].
///
/// For each content field: outer `None` means "absent, leave alone";
/// `Some(None)` means "explicit null, clear"; `Some(Some(v))` overwrites.
/// The viewport is set-only; it is cleared by a reset, never by a patch.
///
/// Patches are produced by the command interpreter's wire decoding, not
/// by serde derive, because field *presence* (not value truthiness) is
/// what controls the overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub locality: Option<Option<String>>,
    pub property_type: Option<Option<String>>,
    pub min_price: Option<Option<u64>>,
    pub max_price: Option<Option<u64>>,
    pub bedrooms: Option<Option<u32>>,
    pub min_score: Option<Option<Decimal>>,
    pub litigation: Option<Option<u32>>,
    pub rera_status: Option<Option<ReraStatus>>,
    pub ids: Option<Option<Vec<String>>>,
    pub viewport: Option<Viewport>,
}

impl FilterPatch {
    pub fn is_empty(&self) -> bool {
        self == &FilterPatch::default()
    }

    /// True iff the patch touches at least one non-viewport field.
    pub fn has_content(&self) -> bool {
        let without_viewport = FilterPatch {
            viewport: None,
            ..self.clone()
        };
        !without_viewport.is_empty()
    }
}
