//! Geospatial provider discovery for the Nimart marketplace.
//!
//! Pipeline: provider rows from the store go through [`index`] (distance
//! enrichment, visibility, filtering, ordering), then [`markers`] turns the
//! survivors into map markers and a viewport clipped to the country.
//! [`region`] classifies points against the state reference list, which
//! [`GeoService`] caches with a TTL.
//!
//! No I/O happens here except in [`region::source::LiveRegionSource`].

pub mod distance;
pub mod error;
pub mod index;
pub mod markers;
pub mod region;
pub mod service;
pub mod types;

pub use distance::{distance_km, format_distance};
pub use error::GeoError;
pub use index::{dedupe_by_id, discover, is_map_visible, sort_by_distance, GeoIndex};
pub use markers::{compute_bounds, marker_style, to_markers, MarkerStyle, ProviderMarker};
pub use region::cache::{Clock, RegionCache, SystemClock, DEFAULT_REGION_CACHE_TTL};
pub use region::source::{
    LiveRegionSource, RegionDataSource, ResilientRegionSource, StaticRegionSource,
};
pub use region::{
    is_within_bounds, locate, nearest_region, RegionMatch, NIGERIAN_STATES, NIGERIA_BOUNDS,
};
pub use service::{map_view, GeoService, MapView};
pub use types::{
    GeoPoint, IndexedProvider, MapFilterCriteria, Provider, Region, RegionBoundingBox,
    VerificationFilter, VerificationStatus,
};
