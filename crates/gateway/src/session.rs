//! Session cookie handling and the authenticated-user extractor.

use std::sync::Arc;

use accountdesk_accounts::{AccountError, User};
use accountdesk_auth::AuthError;
use accountdesk_config::AuthConfig;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::state::GatewayState;

/// Name and flags of the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    secure: bool,
}

impl SessionCookies {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            name: config.session_cookie.clone(),
            secure: config.secure_cookies,
        }
    }

    pub fn token(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.name)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
    }

    pub fn issue(&self, jar: CookieJar, token: String) -> CookieJar {
        jar.add(
            Cookie::build((self.name.clone(), token))
                .path("/")
                .http_only(true)
                .secure(self.secure)
                .same_site(SameSite::Lax),
        )
    }

    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(self.name.clone()).path("/"))
    }
}

/// The user behind a valid session cookie.
///
/// Requests without one are redirected to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

#[async_trait]
impl FromRequestParts<Arc<GatewayState>> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<GatewayState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = state.cookies.token(&jar) else {
            return Err(Redirect::to("/login").into_response());
        };

        let session = match state.authenticator.authenticate_token(&token).await {
            Ok(session) => session,
            Err(AuthError::Database(err)) => {
                warn!(error = %err, "session lookup failed");
                return Err(GatewayError::from(AuthError::Database(err)).into_response());
            }
            Err(err) => {
                debug!(error = %err, "rejected session cookie");
                return Err(to_login(state, jar));
            }
        };

        match state.accounts.current_user(session.user_id).await {
            Ok(user) => Ok(CurrentUser { user }),
            Err(AccountError::UserNotFound) => Err(to_login(state, jar)),
            Err(err) => {
                warn!(user_id = session.user_id, error = %err, "failed to load session user");
                Err(GatewayError::from(err).into_response())
            }
        }
    }
}

fn to_login(state: &GatewayState, jar: CookieJar) -> Response {
    (state.cookies.clear(jar), Redirect::to("/login")).into_response()
}
