//! Great-circle distance and its display label.

use crate::types::GeoPoint;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometres, rounded to 2 decimals.
///
/// Symmetric, and exactly `0.0` for identical points.
#[must_use]
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Clamp guards against h drifting a hair above 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    round_2dp(EARTH_RADIUS_KM * c)
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Human-readable distance label.
///
/// | range         | label            |
/// |---------------|------------------|
/// | `< 1`         | `< 1 km away`    |
/// | `1 ..< 10`    | `5.3 km away`    |
/// | `10 ..< 100`  | `55 km away`     |
/// | `>= 100`      | `~150 km away`   |
///
/// The band is picked from the value as it will be shown, so `9.96` reads
/// `10 km away` and `99.6` reads `~100 km away`. NaN, infinities and
/// negatives read as near.
#[must_use]
pub fn format_distance(km: f64) -> String {
    if !km.is_finite() || km < 1.0 {
        return "< 1 km away".to_string();
    }
    let tenths = (km * 10.0).round() / 10.0;
    if tenths < 10.0 {
        return format!("{tenths:.1} km away");
    }
    let whole = km.round();
    if whole < 100.0 {
        format!("{whole:.0} km away")
    } else {
        format!("~{whole:.0} km away")
    }
}
