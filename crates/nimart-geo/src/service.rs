//! [`GeoService`]: one owned entry point over the geospatial core.
//!
//! The service owns the region cache (and through it the region data
//! source). [`map_view`] is the pure projection over [`crate::index`] and
//! [`crate::markers`] and lives alongside it as a free function.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::error::GeoError;
use crate::index::discover;
use crate::markers::{compute_bounds, to_markers, ProviderMarker};
use crate::region::cache::{Clock, RegionCache, SystemClock};
use crate::region::source::RegionDataSource;
use crate::region::{locate, nearest_region, RegionMatch};
use crate::types::{
    GeoPoint, IndexedProvider, MapFilterCriteria, Provider, Region, RegionBoundingBox,
};

/// Everything the map view needs for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub providers: Vec<IndexedProvider>,
    pub markers: Vec<ProviderMarker>,
    pub bounds: RegionBoundingBox,
}

#[derive(Debug)]
pub struct GeoService<S, C = SystemClock> {
    regions: RegionCache<S, C>,
}

impl<S: RegionDataSource> GeoService<S, SystemClock> {
    #[must_use]
    pub fn new(source: S, region_ttl: Duration) -> Self {
        Self {
            regions: RegionCache::new(source, region_ttl),
        }
    }
}

impl<S, C> GeoService<S, C>
where
    S: RegionDataSource,
    C: Clock,
{
    #[must_use]
    pub fn with_clock(source: S, region_ttl: Duration, clock: C) -> Self {
        Self {
            regions: RegionCache::with_clock(source, region_ttl, clock),
        }
    }

    /// The current region list, served from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns the source's error when a fetch is needed and fails.
    pub async fn regions(&self) -> Result<Arc<Vec<Region>>, GeoError> {
        self.regions.get().await
    }

    /// Re-fetch the region list now.
    ///
    /// # Errors
    ///
    /// Returns the source's error; the previous list stays cached.
    pub async fn refresh_regions(&self) -> Result<Arc<Vec<Region>>, GeoError> {
        self.regions.refresh().await
    }

    /// Name of the region closest to `point`, or `None` for an empty list.
    ///
    /// # Errors
    ///
    /// Returns the source's error when the region list cannot be loaded.
    pub async fn nearest_region(&self, point: GeoPoint) -> Result<Option<String>, GeoError> {
        let regions = self.regions().await?;
        Ok(nearest_region(point, &regions).map(|r| r.name.to_string()))
    }

    /// Nearest region for a point inside the national bounds.
    ///
    /// # Errors
    ///
    /// Returns the source's error when the region list cannot be loaded.
    pub async fn locate(&self, point: GeoPoint) -> Result<Option<RegionMatch>, GeoError> {
        let regions = self.regions().await?;
        Ok(locate(point, &regions))
    }
}

/// Run the listing pipeline and project the result for the map.
///
/// Pure; reads no region data.
#[must_use]
pub fn map_view(
    providers: Vec<Provider>,
    origin: Option<GeoPoint>,
    criteria: &MapFilterCriteria,
) -> MapView {
    let providers = discover(providers, origin, criteria);
    let markers = to_markers(&providers, origin);
    let bounds = compute_bounds(&markers);
    MapView {
        providers,
        markers,
        bounds,
    }
}
