use tracing::warn;

use veris_engine::score;
use veris_models::config::MapConfig;
use veris_models::filter::{FilterState, Viewport};
use veris_models::marker::{Marker, Projection};
use veris_models::profile::RiskProfile;
use veris_models::property::Property;

/// Padding added around the auto-fit bounding box, in degrees.
const FIT_PADDING_DEG: f64 = 0.01;

/// Projects a property result set into map markers plus a viewport.
///
/// Applies the client-side filter fields the store cannot: the `ids`
/// allow-list, minimum score, maximum open litigation, and RERA status.
/// Bad individual records degrade to a skipped marker, never a failed
/// batch.
pub struct MarkerProjector {
    config: MapConfig,
}

impl MarkerProjector {
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }

    /// The configured map home, used before any projection exists.
    pub fn home_viewport(&self) -> Viewport {
        Viewport {
            center_lat: self.config.home_lat,
            center_lng: self.config.home_lng,
            zoom: self.config.home_zoom,
        }
    }

    pub fn project(
        &self,
        properties: &[Property],
        state: &FilterState,
        profile: &RiskProfile,
    ) -> Projection {
        let mut markers = Vec::new();

        for property in properties {
            if let Some(ids) = &state.ids {
                if !ids.iter().any(|id| id == &property.id) {
                    continue;
                }
            }
            if let Some(max_litigation) = state.litigation {
                if property.litigation > max_litigation {
                    continue;
                }
            }
            if let Some(rera) = state.rera_status {
                if property.rera_status != rera {
                    continue;
                }
            }

            let Some(location) = property.location() else {
                warn!(id = %property.id, "property has no location; skipping marker");
                continue;
            };

            let result = match score(property, profile) {
                Ok(result) => result,
                Err(e) => {
                    warn!(id = %property.id, error = %e, "property failed scoring; skipping marker");
                    continue;
                }
            };

            if let Some(min_score) = state.min_score {
                if result.score < min_score {
                    continue;
                }
            }

            markers.push(Marker {
                id: property.id.clone(),
                title: property.title.clone(),
                lat: location.lat,
                lng: location.lng,
                price: property.price,
                score: result.score,
                verdict: result.verdict,
            });
        }

        let viewport = match state.viewport {
            // An explicit viewport wins over auto-fit.
            Some(viewport) => Some(viewport),
            None => self.fit_viewport(&markers),
        };

        Projection { markers, viewport }
    }

    /// Bounding-box fit over the surviving markers. An empty set yields
    /// `None` so the caller keeps whatever viewport it already had.
    fn fit_viewport(&self, markers: &[Marker]) -> Option<Viewport> {
        let first = markers.first()?;
        let mut min_lat = first.lat;
        let mut max_lat = first.lat;
        let mut min_lng = first.lng;
        let mut max_lng = first.lng;

        for marker in &markers[1..] {
            min_lat = min_lat.min(marker.lat);
            max_lat = max_lat.max(marker.lat);
            min_lng = min_lng.min(marker.lng);
            max_lng = max_lng.max(marker.lng);
        }

        let span = (max_lat - min_lat)
            .max(max_lng - min_lng)
            .max(0.0)
            + 2.0 * FIT_PADDING_DEG;
        let zoom = (360.0 / span).log2().min(self.config.max_fit_zoom);

        Some(Viewport {
            center_lat: (min_lat + max_lat) / 2.0,
            center_lng: (min_lng + max_lng) / 2.0,
            zoom,
        })
    }
}
