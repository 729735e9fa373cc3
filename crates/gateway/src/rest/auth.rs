//! Registration, login and logout endpoints

use std::sync::Arc;

use accountdesk_accounts::{LoginRequest, RegisterRequest};
use axum::{
    extract::State,
    response::Redirect,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use super::{log_rejection, PageView};
use crate::flash::{self, Flash};
use crate::form::PostedForm;
use crate::state::GatewayState;

const REGISTERED: &str = "Registration successful! Please log in.";
const LOGGED_OUT: &str = "You have been logged out.";

/// Create authentication routes
pub fn create_auth_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/", get(login_page))
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout).post(logout))
}

pub async fn login_page(jar: CookieJar) -> (CookieJar, Json<PageView<()>>) {
    let (jar, messages) = flash::take(jar);
    (jar, Json(PageView::bare("login", messages)))
}

pub async fn register_page(jar: CookieJar) -> (CookieJar, Json<PageView<()>>) {
    let (jar, messages) = flash::take(jar);
    (jar, Json(PageView::bare("register", messages)))
}

pub async fn register(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    PostedForm(form): PostedForm<RegisterRequest>,
) -> (CookieJar, Redirect) {
    match state.accounts.register(form).await {
        Ok(_) => (
            flash::push(jar, Flash::success(REGISTERED)),
            Redirect::to("/login"),
        ),
        Err(err) => {
            log_rejection(&err);
            (
                flash::push(jar, Flash::error(err.to_string())),
                Redirect::to("/register"),
            )
        }
    }
}

pub async fn login(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    PostedForm(form): PostedForm<LoginRequest>,
) -> (CookieJar, Redirect) {
    let user = match state.accounts.verify_credentials(form).await {
        Ok(user) => user,
        Err(err) => {
            log_rejection(&err);
            return (
                flash::push(jar, Flash::error(err.to_string())),
                Redirect::to("/login"),
            );
        }
    };

    match state.authenticator.issue_session(user.id).await {
        Ok(session) => {
            info!(user_id = user.id, "user logged in");
            (
                state.cookies.issue(jar, session.token),
                Redirect::to("/preferences"),
            )
        }
        Err(err) => {
            warn!(user_id = user.id, error = %err, "failed to issue session");
            (
                flash::push(jar, Flash::error(format!("An error occurred during login: {err}"))),
                Redirect::to("/login"),
            )
        }
    }
}

/// Always succeeds, with or without a live session.
pub async fn logout(State(state): State<Arc<GatewayState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(token) = state.cookies.token(&jar) {
        if let Err(err) = state.authenticator.revoke_session(&token).await {
            warn!(error = %err, "failed to revoke session on logout");
        }
    }

    let jar = state.cookies.clear(jar);
    (
        flash::push(jar, Flash::success(LOGGED_OUT)),
        Redirect::to("/login"),
    )
}
