use std::sync::Arc;

mod app;
mod auth;
mod config;
mod state;

use crate::auth::repo::MongoUserStore;
use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "bandfinder=debug,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    if let Err(e) = dotenv {
        tracing::warn!(error = %e, "could not load .env file; using process environment");
    }

    let config = AppConfig::from_env()?;
    let store = Arc::new(MongoUserStore::connect(&config).await?);

    let state = AppState::with_store(store.clone());
    let result = app::serve(app::build_app(state), &config).await;

    store.shutdown().await;
    result
}
