//! # astra-api -- Binary Entry Point
//!
//! Loads `.env`, builds the upstream clients that are configured, hydrates
//! the stores from Postgres, starts the background scanner, and serves
//! until Ctrl-C.

use astra_api::config::AppConfig;
use astra_api::services::scanner::Scanner;
use astra_api::state::AppState;
use astra_clients::{LedgerClient, LedgerConfig, LlmClient, LlmConfig, SerpClient, SerpConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    // Initialize structured tracing. LOG_FORMAT=json for log shippers.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = AppConfig::from_env();
    let port = config.port;
    tracing::info!(environment = %config.environment, require_auth = config.require_auth, "configuration loaded");

    // Initialize database pool (optional; absent means in-memory only).
    let db_pool = astra_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let mut state = AppState::with_config(config.clone()).with_db_pool(db_pool);

    match LlmConfig::from_env() {
        Ok(llm_config) => {
            tracing::info!(models = ?llm_config.models, "LLM client configured");
            state = state.with_llm(LlmClient::new(llm_config)?);
        }
        Err(e) => {
            tracing::warn!("LLM client not configured: {e}. Analyses will use the offline draft.");
        }
    }

    if config.enable_live_market_data {
        match SerpConfig::from_env() {
            Ok(serp_config) => {
                tracing::info!("search client configured, live market data enabled");
                state = state.with_serp(SerpClient::new(serp_config)?);
            }
            Err(e) => {
                tracing::warn!("search client not configured: {e}. Serving mock market data.");
            }
        }
    }

    if config.enable_blockchain {
        match LedgerConfig::from_env() {
            Ok(ledger_config) => {
                let client = LedgerClient::new(ledger_config)?;
                if client.is_connected().await {
                    tracing::info!(wallet = %client.wallet_address(), "ledger client connected");
                } else {
                    tracing::warn!("ledger node unreachable or on the wrong chain; proofs fall back to the database until it recovers");
                }
                state = state.with_ledger(client);
            }
            Err(e) => {
                tracing::warn!("ledger client not configured: {e}. Proofs are stored in the database.");
            }
        }
    }

    // Hydrate in-memory stores from database (if connected).
    state.hydrate_from_db().await.map_err(|e| {
        tracing::error!("Database hydration failed: {e}");
        e
    })?;

    let scanner = config
        .enable_background_scanner
        .then(|| Scanner::start(state.clone()));

    let app = astra_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("AstraMark API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scanner) = scanner {
        scanner.stop();
    }
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
