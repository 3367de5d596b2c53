//! Where region reference data comes from.
//!
//! [`StaticRegionSource`] serves the compiled-in list. [`LiveRegionSource`]
//! reads the `states` table from the hosted database's REST interface.
//! [`ResilientRegionSource`] tries the live source first and falls back to a
//! second source on any failure.

use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use super::{find_region, NIGERIAN_STATES};
use crate::error::GeoError;
use crate::types::{GeoPoint, Region};

/// A provider of the region reference list.
pub trait RegionDataSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the full region list.
    fn fetch_regions(&self) -> impl Future<Output = Result<Vec<Region>, GeoError>> + Send;
}

/// The compiled-in list of states. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRegionSource;

impl RegionDataSource for StaticRegionSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_regions(&self) -> Result<Vec<Region>, GeoError> {
        Ok(NIGERIAN_STATES.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct StateRow {
    name: String,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

/// Reads `states` through the hosted database's REST endpoint
/// (`/rest/v1/states`).
#[derive(Debug, Clone)]
pub struct LiveRegionSource {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl LiveRegionSource {
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`GeoError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent("nimart/0.1 (provider-discovery)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeoError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn states_url(&self) -> Result<Url, GeoError> {
        let mut url = self
            .base_url
            .join("rest/v1/states")
            .map_err(|e| GeoError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("select", "name,latitude,longitude")
            .append_pair("order", "name.asc");
        Ok(url)
    }
}

impl RegionDataSource for LiveRegionSource {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn fetch_regions(&self) -> Result<Vec<Region>, GeoError> {
        let url = self.states_url()?;
        let mut request = self.client.get(url.clone());
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let rows: Vec<StateRow> =
            serde_json::from_str(&body).map_err(|e| GeoError::Deserialize {
                context: "states".to_string(),
                source: e,
            })?;

        let regions = regions_from_rows(rows);
        if regions.is_empty() {
            return Err(GeoError::EmptyRegionList);
        }
        Ok(regions)
    }
}

/// Turn raw `states` rows into regions.
///
/// The table does not always carry coordinates; missing ones are taken from
/// the compiled-in list by name. Rows that still lack a valid point are
/// dropped.
fn regions_from_rows(rows: Vec<StateRow>) -> Vec<Region> {
    rows.into_iter()
        .filter_map(|row| {
            let name = row.name.trim();
            if name.is_empty() {
                return None;
            }
            let point = match (row.latitude, row.longitude) {
                (Some(lat), Some(lng)) => GeoPoint::try_new(lat, lng).ok(),
                _ => None,
            }
            .or_else(|| find_region(name, NIGERIAN_STATES).map(Region::point))?;

            Some(Region {
                name: Cow::Owned(name.to_string()),
                lat: point.lat,
                lng: point.lng,
            })
        })
        .collect()
}

/// Tries `live` (when configured) and falls back to `fallback` on any error.
#[derive(Debug, Clone)]
pub struct ResilientRegionSource<L, F = StaticRegionSource> {
    live: Option<L>,
    fallback: F,
}

impl<L, F> ResilientRegionSource<L, F> {
    #[must_use]
    pub fn new(live: Option<L>, fallback: F) -> Self {
        Self { live, fallback }
    }
}

impl<L> ResilientRegionSource<L, StaticRegionSource> {
    /// A source that never goes to the network.
    #[must_use]
    pub fn static_only() -> Self {
        Self::new(None, StaticRegionSource)
    }
}

impl<L, F> RegionDataSource for ResilientRegionSource<L, F>
where
    L: RegionDataSource,
    F: RegionDataSource,
{
    fn name(&self) -> &'static str {
        "resilient"
    }

    async fn fetch_regions(&self) -> Result<Vec<Region>, GeoError> {
        if let Some(live) = &self.live {
            match live.fetch_regions().await {
                Ok(regions) => return Ok(regions),
                Err(err) => {
                    tracing::warn!(
                        source = live.name(),
                        fallback = self.fallback.name(),
                        error = %err,
                        "region source failed, using fallback"
                    );
                }
            }
        }
        self.fallback.fetch_regions().await
    }
}
