//! Map markers and viewport bounds for the map-rendering client.
//!
//! Markers are rebuilt on every call and never stored. Bounds are always
//! clipped to [`NIGERIA_BOUNDS`] so a stray coordinate cannot pull the
//! viewport out of the country.

use serde::Serialize;

use crate::distance::{distance_km, format_distance};
use crate::region::NIGERIA_BOUNDS;
use crate::types::{GeoPoint, IndexedProvider, RegionBoundingBox, VerificationStatus};

/// Degrees added on every side of the marker extent.
pub const BOUNDS_PADDING_DEG: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Blue,
    Amber,
    Gray,
}

impl MarkerColor {
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            MarkerColor::Green => "#16a34a",
            MarkerColor::Blue => "#2563eb",
            MarkerColor::Amber => "#d97706",
            MarkerColor::Gray => "#6b7280",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSize {
    Large,
    Medium,
    Small,
}

impl MarkerSize {
    /// Icon diameter in CSS pixels.
    #[must_use]
    pub fn diameter_px(self) -> u32 {
        match self {
            MarkerSize::Large => 40,
            MarkerSize::Medium => 32,
            MarkerSize::Small => 24,
        }
    }
}

/// Resolved marker appearance. `fill` and `diameter_px` are derived from
/// `color` and `size` so the client does not need its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    pub color: MarkerColor,
    pub size: MarkerSize,
    pub fill: &'static str,
    pub diameter_px: u32,
}

/// Marker style lookup. Anything not listed is styled as unverified.
#[must_use]
pub fn marker_style(status: VerificationStatus) -> MarkerStyle {
    let (color, size) = match status {
        VerificationStatus::Verified => (MarkerColor::Green, MarkerSize::Large),
        VerificationStatus::Pending => (MarkerColor::Blue, MarkerSize::Medium),
        VerificationStatus::Demo => (MarkerColor::Gray, MarkerSize::Small),
        VerificationStatus::Unverified
        | VerificationStatus::PendingEmail
        | VerificationStatus::Unknown => (MarkerColor::Amber, MarkerSize::Medium),
    };
    MarkerStyle {
        color,
        size,
        fill: color.hex(),
        diameter_px: size.diameter_px(),
    }
}

/// What the map client draws for one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderMarker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub verification_status: VerificationStatus,
    pub is_online: bool,
    pub style: MarkerStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_label: Option<String>,
    pub business_name: Option<String>,
    pub service_type: Option<String>,
    pub rating: f64,
    pub state_name: Option<String>,
    pub profile_image_url: Option<String>,
}

impl ProviderMarker {
    #[must_use]
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// One marker per provider that has a location, in input order.
///
/// With an origin, each marker carries the provider's distance, reusing the
/// index's value when present.
#[must_use]
pub fn to_markers(providers: &[IndexedProvider], origin: Option<GeoPoint>) -> Vec<ProviderMarker> {
    let origin = origin.filter(GeoPoint::is_valid);
    providers
        .iter()
        .filter_map(|entry| {
            let p = &entry.provider;
            let location = p.location()?;
            let distance =
                origin.map(|o| entry.distance_km.unwrap_or_else(|| distance_km(o, location)));
            Some(ProviderMarker {
                id: p.id.clone(),
                lat: location.lat,
                lng: location.lng,
                verification_status: p.verification_status,
                is_online: p.is_online(),
                style: marker_style(p.verification_status),
                distance_km: distance,
                distance_label: distance.map(format_distance),
                business_name: p.business_name.clone(),
                service_type: p.service_type.clone(),
                rating: p.rating(),
                state_name: p.state_name.clone(),
                profile_image_url: p.profile_image_url.clone(),
            })
        })
        .collect()
}

/// Viewport that fits every marker, padded and clipped to the country.
///
/// An empty slice yields [`NIGERIA_BOUNDS`].
#[must_use]
pub fn compute_bounds(markers: &[ProviderMarker]) -> RegionBoundingBox {
    let mut points = markers
        .iter()
        .map(ProviderMarker::point)
        .filter(GeoPoint::is_valid);
    let Some(first) = points.next() else {
        return NIGERIA_BOUNDS;
    };

    let mut extent = RegionBoundingBox {
        north: first.lat,
        south: first.lat,
        east: first.lng,
        west: first.lng,
    };
    for p in points {
        extent.north = extent.north.max(p.lat);
        extent.south = extent.south.min(p.lat);
        extent.east = extent.east.max(p.lng);
        extent.west = extent.west.min(p.lng);
    }

    clip_to_national(RegionBoundingBox {
        north: extent.north + BOUNDS_PADDING_DEG,
        south: extent.south - BOUNDS_PADDING_DEG,
        east: extent.east + BOUNDS_PADDING_DEG,
        west: extent.west - BOUNDS_PADDING_DEG,
    })
}

/// Clamp each edge into the national box.
///
/// A marker cluster lying entirely outside the country collapses onto the
/// nearest national edge instead of producing an inverted box.
fn clip_to_national(padded: RegionBoundingBox) -> RegionBoundingBox {
    let n = NIGERIA_BOUNDS;
    RegionBoundingBox {
        north: padded.north.clamp(n.south, n.north),
        south: padded.south.clamp(n.south, n.north),
        east: padded.east.clamp(n.west, n.east),
        west: padded.west.clamp(n.west, n.east),
    }
}
