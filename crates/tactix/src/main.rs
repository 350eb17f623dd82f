use tactix::{ServerConfig, TactixError, TactixServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), TactixError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let server = TactixServer::builder().config(config).build().await?;

    tracing::info!(
        addr = %server.local_addr()?,
        health = %server.health_addr()?,
        "tactix relay listening"
    );

    server.run().await
}
