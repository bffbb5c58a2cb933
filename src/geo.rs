use crate::point::Point;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points, by the
/// haversine formula. Symmetric, zero for identical inputs, and finite
/// and non-negative for coordinates within valid ranges.
pub fn haversine_km(a: &Point, b: &Point) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let s1 = (dlat / 2.0).sin();
    let s2 = (dlng / 2.0).sin();
    let h = s1 * s1 + a.lat.to_radians().cos() * b.lat.to_radians().cos() * s2 * s2;
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
