//! Great-circle distance computation.

use crate::models::Coordinates;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points via the haversine formula,
/// in kilometers, rounded to 2 decimal places.
///
/// Radius comparisons elsewhere in the crate use this rounded value.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    round2(EARTH_RADIUS_KM * c)
}

fn round2(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
