use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dairy_billing::config::AppConfig;
use dairy_billing::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    config.warn_on_insecure_defaults();

    let app_state = initialize_backend(&config)?;
    let router = create_router(app_state);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Starting dairy billing server on {}", config.bind_address);
    axum::serve(listener, router).await?;

    Ok(())
}
