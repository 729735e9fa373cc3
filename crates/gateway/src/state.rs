//! Shared application state for the gateway

use std::sync::Arc;

use accountdesk_accounts::{AccountService, UserRepository};
use accountdesk_auth::Authenticator;
use accountdesk_config::AppConfig;
use sqlx::SqlitePool;

use crate::error::{GatewayError, GatewayResult};
use crate::session::SessionCookies;

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Registration, login and settings logic
    pub accounts: Arc<AccountService<UserRepository>>,
    /// Session issuance and lookup
    pub authenticator: Authenticator,
    pub cookies: SessionCookies,
}

impl GatewayState {
    pub fn new(
        accounts: Arc<AccountService<UserRepository>>,
        authenticator: Authenticator,
        cookies: SessionCookies,
    ) -> Self {
        Self {
            accounts,
            authenticator,
            cookies,
        }
    }

    /// Open the configured database and wire every service to it.
    pub async fn from_config(config: &AppConfig) -> GatewayResult<Self> {
        let pool = accountdesk_database::initialize_database(&config.database)
            .await
            .map_err(|e| {
                GatewayError::DatabaseError(format!("Failed to initialize database: {e}"))
            })?;

        Ok(Self::with_pool(pool, config))
    }

    pub fn with_pool(pool: SqlitePool, config: &AppConfig) -> Self {
        let accounts = Arc::new(AccountService::new(UserRepository::new(pool.clone())));
        let authenticator = Authenticator::new(pool.clone(), &config.auth);
        let cookies = SessionCookies::from_config(&config.auth);

        Self::new(accounts, authenticator, cookies)
    }
}
