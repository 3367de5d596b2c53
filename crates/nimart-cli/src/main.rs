mod geo;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nimart_geo::VerificationFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nimart-cli")]
#[command(about = "Nimart provider discovery command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Great-circle distance between two points
    Distance {
        #[arg(long, allow_negative_numbers = true)]
        from_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        from_lng: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lng: f64,
    },
    /// Nearest state for a point
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Run the map listing pipeline over a JSON file of provider records
    Discover {
        /// Path to a JSON array of provider records
        #[arg(long)]
        providers: PathBuf,
        /// Search origin latitude (requires --lng)
        #[arg(long, allow_negative_numbers = true, requires = "lng")]
        lat: Option<f64>,
        /// Search origin longitude (requires --lat)
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,
        /// Case-insensitive substring of the service type
        #[arg(long)]
        service_type: Option<String>,
        /// One of: all, verified, unverified, pending
        #[arg(long, default_value = "all")]
        verification: VerificationFilter,
        #[arg(long, default_value_t = 0.0)]
        min_rating: f64,
        /// Search radius, applied only with an origin
        #[arg(long, default_value_t = nimart_geo::types::DEFAULT_MAX_DISTANCE_KM)]
        max_distance_km: f64,
        #[arg(long)]
        online_only: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = nimart_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Distance {
            from_lat,
            from_lng,
            to_lat,
            to_lng,
        }) => geo::run_distance(from_lat, from_lng, to_lat, to_lng)?,
        Some(Commands::Locate { lat, lng }) => geo::run_locate(&config, lat, lng).await?,
        Some(Commands::Discover {
            providers,
            lat,
            lng,
            service_type,
            verification,
            min_rating,
            max_distance_km,
            online_only,
        }) => {
            let criteria = nimart_geo::MapFilterCriteria {
                service_type,
                verification_status: verification,
                min_rating,
                max_distance_km,
                online_only,
            };
            geo::run_discover(&config, &providers, lat.zip(lng), &criteria).await?;
        }
        None => println!("nimart-cli: pass a subcommand (distance, locate, discover); see --help"),
    }

    Ok(())
}
