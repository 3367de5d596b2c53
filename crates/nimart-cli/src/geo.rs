//! Command handlers for the geospatial subcommands.
//!
//! Region data is resolved the same way the server resolves it: the live
//! table when `NIMART_REGIONS_URL` is set, with the compiled-in list as the
//! fallback.

use std::path::Path;

use anyhow::Context;
use nimart_core::AppConfig;
use nimart_geo::{
    distance_km, format_distance, map_view, GeoPoint, GeoService, LiveRegionSource,
    MapFilterCriteria, Provider, ResilientRegionSource, StaticRegionSource,
};

type RegionSource = ResilientRegionSource<LiveRegionSource>;

fn region_source(config: &AppConfig) -> anyhow::Result<RegionSource> {
    let Some(url) = config.regions_url.as_deref() else {
        return Ok(ResilientRegionSource::static_only());
    };
    let live = LiveRegionSource::new(
        url,
        config.regions_api_key.clone(),
        config.http_timeout_secs,
    )?;
    Ok(ResilientRegionSource::new(Some(live), StaticRegionSource))
}

fn geo_service(config: &AppConfig) -> anyhow::Result<GeoService<RegionSource>> {
    Ok(GeoService::new(
        region_source(config)?,
        config.region_cache_ttl(),
    ))
}

pub(crate) fn run_distance(
    from_lat: f64,
    from_lng: f64,
    to_lat: f64,
    to_lng: f64,
) -> anyhow::Result<()> {
    let from = GeoPoint::try_new(from_lat, from_lng).context("invalid --from point")?;
    let to = GeoPoint::try_new(to_lat, to_lng).context("invalid --to point")?;
    let km = distance_km(from, to);
    println!("{km:.2} km ({})", format_distance(km));
    Ok(())
}

pub(crate) async fn run_locate(config: &AppConfig, lat: f64, lng: f64) -> anyhow::Result<()> {
    let point = GeoPoint::try_new(lat, lng)?;
    let geo = geo_service(config)?;
    match geo.locate(point).await? {
        Some(found) => println!("{} ({:.2} km)", found.name, found.distance_km),
        None => println!("outside supported region"),
    }
    Ok(())
}

pub(crate) async fn run_discover(
    config: &AppConfig,
    path: &Path,
    origin: Option<(f64, f64)>,
    criteria: &MapFilterCriteria,
) -> anyhow::Result<()> {
    let providers = read_providers(path)?;
    let origin = origin
        .map(|(lat, lng)| GeoPoint::try_new(lat, lng))
        .transpose()
        .context("invalid origin")?;

    let geo = geo_service(config)?;
    if let Some(point) = origin {
        if let Some(region) = geo.nearest_region(point).await? {
            tracing::info!(region = %region, "searching from");
        }
    }

    let view = map_view(providers, origin, criteria);
    tracing::info!(
        matched = view.providers.len(),
        markers = view.markers.len(),
        "discovery complete"
    );
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn read_providers(path: &Path) -> anyhow::Result<Vec<Provider>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_providers(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse_providers(raw: &str) -> anyhow::Result<Vec<Provider>> {
    Ok(serde_json::from_str(raw)?)
}
