use std::sync::Arc;

use accountdesk_accounts::{AccountService, UserRepository};
use accountdesk_auth::Authenticator;
use accountdesk_config::AppConfig;
use accountdesk_database::initialize_database;
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub authenticator: Authenticator,
    pub accounts: Arc<AccountService<UserRepository>>,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.url))?;

        let authenticator = Authenticator::new(db_pool.clone(), &config.auth);
        let accounts = Arc::new(AccountService::new(UserRepository::new(db_pool.clone())));

        info!(url = %config.database.url, "account services ready");

        Ok(Self {
            db_pool,
            authenticator,
            accounts,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
