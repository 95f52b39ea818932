use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use geoip_lookup::config::{Config, IndexBackend};
use geoip_lookup::index::open_index;
use geoip_lookup::lookup::create_lookup_router;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Open the geolocation index
    match config.index.backend {
        IndexBackend::MaxMind => {
            if let Some(ref path) = config.index.city_db_path {
                info!("Using MaxMind City database: {}", path);
            }
            if let Some(ref path) = config.index.asn_db_path {
                info!("Using MaxMind ASN database: {}", path);
            }
        }
        IndexBackend::Ranges => {
            if let Some(ref path) = config.index.ranges_path {
                info!("Using ranges file: {}", path);
            }
        }
    }
    let index = open_index(&config.index)?;
    info!("Geolocation index ready");

    let router = create_lookup_router(index);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 GeoIP lookup server listening on http://{}", addr);
    info!("   - Look up an address at http://{}/<ip>", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
