//! Region classification against the compiled-in Nigerian reference data.
//!
//! The reference list holds the 36 states plus the Federal Capital Territory,
//! each keyed to its capital. [`source`] and [`cache`] wrap that list (or a
//! live copy of it) for callers that want it refreshed periodically.

pub mod cache;
pub mod source;

use serde::Serialize;

use crate::distance::distance_km;
use crate::types::{GeoPoint, Region, RegionBoundingBox};

/// National bounding box. Viewports and region lookups never leave it.
pub const NIGERIA_BOUNDS: RegionBoundingBox = RegionBoundingBox {
    north: 13.9,
    south: 4.0,
    east: 14.7,
    west: 2.7,
};

/// States and the FCT, alphabetical, each at its capital city.
pub const NIGERIAN_STATES: &[Region] = &[
    Region::new_static("Abia", 5.5320, 7.4860),
    Region::new_static("Adamawa", 9.2035, 12.4954),
    Region::new_static("Akwa Ibom", 5.0377, 7.9128),
    Region::new_static("Anambra", 6.2104, 7.0741),
    Region::new_static("Bauchi", 10.3158, 9.8442),
    Region::new_static("Bayelsa", 4.9267, 6.2676),
    Region::new_static("Benue", 7.7322, 8.5391),
    Region::new_static("Borno", 11.8311, 13.1510),
    Region::new_static("Cross River", 4.9757, 8.3417),
    Region::new_static("Delta", 6.1980, 6.7319),
    Region::new_static("Ebonyi", 6.3249, 8.1137),
    Region::new_static("Edo", 6.3350, 5.6037),
    Region::new_static("Ekiti", 7.6211, 5.2214),
    Region::new_static("Enugu", 6.4584, 7.5464),
    Region::new_static("Federal Capital Territory", 9.0765, 7.3986),
    Region::new_static("Gombe", 10.2897, 11.1673),
    Region::new_static("Imo", 5.4850, 7.0350),
    Region::new_static("Jigawa", 11.7562, 9.3388),
    Region::new_static("Kaduna", 10.5105, 7.4165),
    Region::new_static("Kano", 12.0022, 8.5920),
    Region::new_static("Katsina", 12.9908, 7.6018),
    Region::new_static("Kebbi", 12.4539, 4.1975),
    Region::new_static("Kogi", 7.8023, 6.7333),
    Region::new_static("Kwara", 8.4966, 4.5421),
    Region::new_static("Lagos", 6.5244, 3.3792),
    Region::new_static("Nasarawa", 8.4939, 8.5153),
    Region::new_static("Niger", 9.5836, 6.5463),
    Region::new_static("Ogun", 7.1475, 3.3619),
    Region::new_static("Ondo", 7.2571, 5.2058),
    Region::new_static("Osun", 7.7827, 4.5418),
    Region::new_static("Oyo", 7.3775, 3.9470),
    Region::new_static("Plateau", 9.8965, 8.8583),
    Region::new_static("Rivers", 4.8156, 7.0498),
    Region::new_static("Sokoto", 13.0059, 5.2476),
    Region::new_static("Taraba", 8.8937, 11.3596),
    Region::new_static("Yobe", 11.7470, 11.9608),
    Region::new_static("Zamfara", 12.1628, 6.6614),
];

/// Nearest region to a point, with the distance to its reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMatch {
    pub name: String,
    pub distance_km: f64,
}

/// Inclusive check against all four edges of `bounds`.
#[must_use]
pub fn is_within_bounds(point: GeoPoint, bounds: &RegionBoundingBox) -> bool {
    bounds.contains(point)
}

/// Region whose reference point is closest to `point`.
///
/// Linear scan; on equal distances the region listed first wins. Returns
/// `None` only for an empty `regions` slice.
#[must_use]
pub fn nearest_region(point: GeoPoint, regions: &[Region]) -> Option<&Region> {
    nearest_with_distance(point, regions).map(|(region, _)| region)
}

fn nearest_with_distance(point: GeoPoint, regions: &[Region]) -> Option<(&Region, f64)> {
    let mut best: Option<(&Region, f64)> = None;
    for region in regions {
        let d = distance_km(point, region.point());
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((region, d)),
        }
    }
    best
}

/// Nearest region, but only for points inside [`NIGERIA_BOUNDS`].
#[must_use]
pub fn locate(point: GeoPoint, regions: &[Region]) -> Option<RegionMatch> {
    if !point.is_valid() || !is_within_bounds(point, &NIGERIA_BOUNDS) {
        return None;
    }
    nearest_with_distance(point, regions).map(|(region, distance_km)| RegionMatch {
        name: region.name.to_string(),
        distance_km,
    })
}

/// Case-insensitive lookup by region name.
#[must_use]
pub fn find_region<'a>(name: &str, regions: &'a [Region]) -> Option<&'a Region> {
    let wanted = name.trim();
    regions
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(wanted))
}
