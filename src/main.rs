//! Knowledge Explorer - Main Entry Point
//!
//! A terminal client for a retrieval/generation service: submit questions
//! with a retrieval configuration, read the generated answer and the chunks
//! that support it, and revisit earlier searches from the session history.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod models;
mod presentation;
mod services;

use config::Config;
use services::{ApiClient, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing. Logs go to stderr so they stay out of rendered output.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "knowledge_explorer=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    info!("🔷 Starting Knowledge Explorer v{}", env!("CARGO_PKG_VERSION"));

    let client = ApiClient::new(&config.api_base_url, config.request_timeout)?;
    info!("Retrieval service: {}", client.base_url());
    if let Some(timeout) = config.request_timeout {
        info!("Request timeout: {}s", timeout.as_secs());
    }

    let store = SessionStore::new(Arc::new(client));
    // The probe runs in the background; connectivity shows up in :status
    let _probe = store.initialize().await?;

    presentation::run(store, &config).await?;

    info!("Session ended");
    Ok(())
}
