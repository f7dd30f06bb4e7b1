pub mod codec;
pub mod proximity;

pub use codec::{GeoPoint, decode, encode};
pub use proximity::{EARTH_RADIUS_KM, ProximityHit, haversine_km, within_radius};
