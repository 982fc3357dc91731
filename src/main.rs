//! # Gmail Alias Bot Main Entry Point
//!
//! Initializes logging, loads configuration, opens the quota store, and runs
//! the Telegram bot next to the health check server.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gmail_alias_bot::aliases::{AliasGenerator, AliasPolicy};
use gmail_alias_bot::bot::handlers::BotHandler;
use gmail_alias_bot::config::Config;
use gmail_alias_bot::database::connection::DatabaseManager;
use gmail_alias_bot::services::{alias_service::AliasService, health::HealthService, quota::QuotaLedger};
use gmail_alias_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gmail_alias_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Gmail Alias Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Daily quota: {}, UTC offset: {}",
        config.database_url, config.http_port, config.daily_quota, config.utc_offset
    );

    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    let ledger = QuotaLedger::new(db_arc.pool.clone(), config.daily_quota);
    let service = Arc::new(AliasService::new(AliasGenerator::new(AliasPolicy::default()), ledger));

    let bot = Bot::new(&config.telegram_bot_token);
    let handler = BotHandler::new(service, config.utc_offset);
    info!("Telegram bot initialized successfully");

    let health_service = HealthService::new(db_arc.clone(), config.utc_offset);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    db_arc.pool.close().await;
    log_system_event("Application stopped", None);
    Ok(())
}
