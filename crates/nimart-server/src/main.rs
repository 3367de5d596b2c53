mod api;
mod middleware;

use std::sync::Arc;

use nimart_geo::{GeoService, LiveRegionSource, ResilientRegionSource, StaticRegionSource};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, RegionSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = nimart_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let source = region_source(&config)?;
    let geo = GeoService::new(source, config.region_cache_ttl());

    // Warm the cache so the first request doesn't pay for the fetch.
    match geo.regions().await {
        Ok(regions) => tracing::info!(count = regions.len(), "region list loaded"),
        Err(e) => tracing::warn!(error = %e, "region list unavailable at startup"),
    }

    let app = build_app(AppState {
        geo: Arc::new(geo),
        max_providers: config.max_providers,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "nimart-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn region_source(config: &nimart_core::AppConfig) -> anyhow::Result<RegionSource> {
    let Some(url) = config.regions_url.as_deref() else {
        tracing::info!("NIMART_REGIONS_URL not set; using compiled-in region list");
        return Ok(ResilientRegionSource::static_only());
    };

    if config.regions_api_key.is_none() {
        tracing::warn!("NIMART_REGIONS_API_KEY not set; live region requests are unauthenticated");
    }
    let live = LiveRegionSource::new(
        url,
        config.regions_api_key.clone(),
        config.http_timeout_secs,
    )?;
    Ok(ResilientRegionSource::new(Some(live), StaticRegionSource))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
