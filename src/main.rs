use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    let config = Config::from_env(None)?;

    // Initialize tracing; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚀 Starting Movie Rentals API Server");
    info!("📋 Configuration loaded:");
    info!("  🗄️  Database: {}", config.database_url);
    info!("  🌐 API Server: {}", config.api_address());
    info!("  🔌 Pool size: {}", config.db_pool_size);

    api_server::serve(&config).await
}
