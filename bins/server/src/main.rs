//! Expensa API Server
//!
//! Main entry point for the expense ledger service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use expensa_api::{AppState, create_router};
use expensa_db::connect;
use expensa_shared::{AppConfig, AppError, config::LogConfig};

const DEFAULT_FILTER: &str = "expensa=debug,expensa_api=debug,expensa_db=debug,tower_http=debug";

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(log.filter.as_deref().unwrap_or(DEFAULT_FILTER))
    });
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.log);

    // Connect to database
    let db = connect(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    info!(
        enforce_non_negative_balances = config.ledger.enforce_non_negative_balances,
        root_code_base = config.ledger.root_code_base,
        currency = %config.ledger.currency_symbol,
        "Ledger policy loaded"
    );

    let app = create_router(AppState::new(db, config.ledger.clone()));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
