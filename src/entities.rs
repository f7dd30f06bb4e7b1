//! Entity catalog
//!
//! Descriptors for the platform's domain entities, expressed as data. Each
//! of these used to be a hand-written copy of the two-phase protocol; one
//! generic synchronizer plus this table replaces all of them.
//!
//! Collection payload shapes stay opaque to the core: stations carry
//! accessibility flags and per-line schedules, tourist points carry media
//! and embedded reviews, voice guides carry audio track manifests.

use crate::sync::{EntityDescriptor, RollupSpec};

const LIFECYCLE: &[&str] = &["active", "inactive", "pending"];

/// Transit stations. Spatially searchable; deletion is blocked while
/// routes or rider messages still reference the station.
pub fn station() -> EntityDescriptor {
    EntityDescriptor::new("stations", "station_details")
        .coordinate_field("location")
        .default_radius_km(2.0)
        .statuses(LIFECYCLE)
        .dependent("routes", "station_id")
        .dependent("messages", "station_id")
}

/// Transit routes. Not spatial themselves; messages and voice guides hang
/// off them.
pub fn route() -> EntityDescriptor {
    EntityDescriptor::new("routes", "route_details")
        .statuses(LIFECYCLE)
        .dependent("messages", "route_id")
        .dependent("voice_guides", "route_id")
}

/// Tourist points of interest. Spatially searchable with a wider default
/// radius; the mean of embedded review ratings is denormalized onto the
/// core record for sorting.
pub fn tourist_point() -> EntityDescriptor {
    EntityDescriptor::new("tourist_points", "tourist_point_details")
        .coordinate_field("location")
        .default_radius_km(10.0)
        .statuses(LIFECYCLE)
        .rollup(RollupSpec::new("reviews", "rating", "average_rating"))
}

/// Rider-facing messages. Lightweight: most rows never get a detail
/// document, and their statuses are free-form workflow states.
pub fn message() -> EntityDescriptor {
    EntityDescriptor::new("messages", "message_details")
}

/// Voice guides for routes and points.
pub fn voice_guide() -> EntityDescriptor {
    EntityDescriptor::new("voice_guides", "voice_guide_details").statuses(LIFECYCLE)
}

/// Accessibility service ratings; the mean score is denormalized for the
/// reporting endpoints.
pub fn service_rating() -> EntityDescriptor {
    EntityDescriptor::new("service_ratings", "service_rating_details")
        .rollup(RollupSpec::new("scores", "value", "average_score"))
}

/// The full catalog, in dependency order (dependents last).
pub fn all() -> Vec<EntityDescriptor> {
    vec![
        station(),
        route(),
        tourist_point(),
        message(),
        voice_guide(),
        service_rating(),
    ]
}
