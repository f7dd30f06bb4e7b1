//! Proximity Matcher
//!
//! Great-circle filtering over core records that carry a coordinate field.
//! This is an O(n) scan with no spatial index — acceptable for the target
//! cardinalities (hundreds to low thousands of stations/points). Revisit
//! with a spatial index before pointing it at larger sets.

use std::cmp::Ordering;

use log::debug;

use crate::core::CoreRecord;
use crate::geo::codec::{self, GeoPoint};

/// Mean Earth radius in kilometers, fixed for all distance computations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A record retained by the matcher, with its computed distance attached
/// for display.
#[derive(Debug, Clone)]
pub struct ProximityHit {
    pub record: CoreRecord,
    pub distance_km: f64,
}

/// Great-circle distance between two points via the haversine formula.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Filter records to those within `radius_km` of `origin`, sorted ascending
/// by distance.
///
/// Records without the coordinate field, or whose coordinate fails to
/// decode, are skipped — never an error. Ties keep input relative order
/// (the sort is stable).
pub fn within_radius(
    records: impl IntoIterator<Item = CoreRecord>,
    coordinate_field: &str,
    origin: GeoPoint,
    radius_km: f64,
) -> Vec<ProximityHit> {
    let mut hits = Vec::new();

    for record in records {
        let Some(raw) = record.coordinate(coordinate_field) else {
            continue;
        };
        let point = match codec::decode(raw) {
            Ok(point) => point,
            Err(err) => {
                debug!(
                    "skipping record {} from proximity scan: {}",
                    record.id, err
                );
                continue;
            }
        };

        let distance_km = haversine_km(origin, point);
        if distance_km <= radius_km {
            hits.push(ProximityHit {
                record,
                distance_km,
            });
        }
    }

    hits.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_for_same_point() {
        let p = GeoPoint {
            lat: 48.8566,
            lng: 2.3522,
        };
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn haversine_known_distance() {
        // Paris <-> London, roughly 343-344 km.
        let paris = GeoPoint {
            lat: 48.8566,
            lng: 2.3522,
        };
        let london = GeoPoint {
            lat: 51.5074,
            lng: -0.1278,
        };
        let d = haversine_km(paris, london);
        assert!((343.0..345.0).contains(&d), "got {}", d);
    }

    #[test]
    fn one_degree_latitude_is_about_111_km() {
        let a = GeoPoint { lat: 0.0, lng: 0.0 };
        let b = GeoPoint { lat: 1.0, lng: 0.0 };
        let d = haversine_km(a, b);
        assert!((111.0..111.4).contains(&d), "got {}", d);
    }
}
