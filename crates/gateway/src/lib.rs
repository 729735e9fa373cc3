//! # accountdesk gateway
//!
//! HTTP layer for accountdesk: form handlers that call into the account
//! service, the session cookie extractor and the cookie-backed flash queue.
//! Pages are rendered as JSON documents.
//!
//! ## Usage
//!
//! ```no_run
//! use accountdesk_config::AppConfig;
//! use accountdesk_gateway::{create_router, GatewayState};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let state = GatewayState::from_config(&AppConfig::default()).await?;
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod flash;
pub mod form;
pub mod middleware;
pub mod rest;
pub mod session;
pub mod state;

pub use error::{GatewayError, GatewayResult};
pub use flash::{Flash, FlashLevel, FLASH_COOKIE};
pub use form::{PostedForm, UNREADABLE_FORM};
pub use session::{CurrentUser, SessionCookies};
pub use state::GatewayState;

use std::sync::Arc;

use axum::Router;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .merge(rest::create_rest_routes())
        .with_state(Arc::new(state))
        .layer(middleware::create_trace_middleware())
}
