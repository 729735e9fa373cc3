//! HTTP endpoints for the gateway

pub mod auth;
pub mod health;
pub mod settings;

use std::sync::Arc;

use accountdesk_accounts::{AccountError, ErrorKind};
use axum::{routing::get, Router};
use serde::Serialize;
use tracing::{debug, warn};

use crate::flash::Flash;
use crate::state::GatewayState;

/// Create all routes
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::create_auth_routes())
        .merge(settings::create_settings_routes())
}

/// Page rendered for a GET request: the drained flash queue plus an
/// optional payload.
#[derive(Debug, Serialize)]
pub struct PageView<T> {
    pub page: &'static str,
    pub messages: Vec<Flash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<T>,
}

impl PageView<()> {
    pub fn bare(page: &'static str, messages: Vec<Flash>) -> Self {
        Self {
            page,
            messages,
            preferences: None,
        }
    }
}

impl<T> PageView<T> {
    pub fn with(page: &'static str, messages: Vec<Flash>, preferences: T) -> Self {
        Self {
            page,
            messages,
            preferences: Some(preferences),
        }
    }
}

pub(crate) fn log_rejection(err: &AccountError) {
    match err.kind() {
        ErrorKind::Persistence => warn!(error = %err, "account operation failed"),
        _ => debug!(error = %err, "account request rejected"),
    }
}
