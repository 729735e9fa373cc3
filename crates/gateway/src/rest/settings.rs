//! Preference pages and the four settings forms

use std::sync::Arc;

use accountdesk_accounts::{
    AccountSettingsRequest, AccountUpdate, NotificationUpdate, PreferencesView, PrivacyUpdate,
    PrivacyView, ThemeUpdate, ThemeView, User,
};
use axum::{
    extract::State,
    response::Redirect,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::warn;

use super::{log_rejection, PageView};
use crate::flash::{self, Flash};
use crate::form::PostedForm;
use crate::session::CurrentUser;
use crate::state::GatewayState;

const NOTIFICATIONS_SAVED: &str = "Notification settings updated successfully!";
const THEME_SAVED: &str = "Theme settings updated successfully!";
const PRIVACY_SAVED: &str = "Privacy settings updated successfully!";

/// Create settings routes; every one requires a session
pub fn create_settings_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/preferences", get(preferences))
        .route(
            "/account-settings",
            get(preferences).post(update_account),
        )
        .route(
            "/notification-settings",
            get(preferences).post(update_notifications),
        )
        .route("/theme-settings", get(theme).post(update_theme))
        .route("/privacy-settings", get(privacy).post(update_privacy))
}

/// Checkboxes are only submitted when ticked.
#[derive(Debug, Deserialize)]
pub struct NotificationForm {
    pub email_notifications: Option<String>,
    pub push_notifications: Option<String>,
    pub notification_frequency: Option<String>,
}

impl From<NotificationForm> for NotificationUpdate {
    fn from(form: NotificationForm) -> Self {
        Self {
            email_notifications: form.email_notifications.is_some(),
            push_notifications: form.push_notifications.is_some(),
            notification_frequency: form.notification_frequency,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrivacyForm {
    pub profile_visibility: Option<String>,
    pub data_sharing: Option<String>,
}

impl From<PrivacyForm> for PrivacyUpdate {
    fn from(form: PrivacyForm) -> Self {
        Self {
            profile_visibility: form.profile_visibility,
            data_sharing: form.data_sharing.is_some(),
        }
    }
}

pub async fn preferences(
    State(state): State<Arc<GatewayState>>,
    CurrentUser { user }: CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Json<PageView<PreferencesView>>) {
    let (jar, messages) = flash::take(jar);
    let view = state.accounts.preferences(&user);
    (jar, Json(PageView::with("preferences", messages, view)))
}

pub async fn theme(
    State(state): State<Arc<GatewayState>>,
    CurrentUser { user }: CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Json<PageView<ThemeView>>) {
    let (jar, messages) = flash::take(jar);
    let view = state.accounts.theme(&user);
    (jar, Json(PageView::with("theme-settings", messages, view)))
}

pub async fn privacy(
    State(state): State<Arc<GatewayState>>,
    CurrentUser { user }: CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Json<PageView<PrivacyView>>) {
    let (jar, messages) = flash::take(jar);
    let view = state.accounts.privacy(&user);
    (jar, Json(PageView::with("privacy-settings", messages, view)))
}

pub async fn update_account(
    State(state): State<Arc<GatewayState>>,
    CurrentUser { user }: CurrentUser,
    jar: CookieJar,
    PostedForm(form): PostedForm<AccountSettingsRequest>,
) -> (CookieJar, Redirect) {
    match state.accounts.update_account(user, form).await {
        Ok(update @ AccountUpdate::PasswordChanged(_)) => {
            let user_id = update.user().id;
            if let Err(err) = state.authenticator.revoke_user_sessions(user_id).await {
                warn!(user_id, error = %err, "failed to revoke sessions after password change");
            }

            let jar = state.cookies.clear(jar);
            (
                flash::push(jar, Flash::success(update.message())),
                Redirect::to("/login"),
            )
        }
        Ok(update) => (
            flash::push(jar, Flash::success(update.message())),
            Redirect::to("/preferences"),
        ),
        Err(err) => {
            log_rejection(&err);
            (
                flash::push(jar, Flash::error(err.to_string())),
                Redirect::to("/preferences"),
            )
        }
    }
}

pub async fn update_notifications(
    State(state): State<Arc<GatewayState>>,
    CurrentUser { user }: CurrentUser,
    jar: CookieJar,
    PostedForm(form): PostedForm<NotificationForm>,
) -> (CookieJar, Redirect) {
    let result = state
        .accounts
        .update_notifications(user, form.into())
        .await;
    saved(jar, result, NOTIFICATIONS_SAVED)
}

pub async fn update_theme(
    State(state): State<Arc<GatewayState>>,
    CurrentUser { user }: CurrentUser,
    jar: CookieJar,
    PostedForm(form): PostedForm<ThemeUpdate>,
) -> (CookieJar, Redirect) {
    let result = state.accounts.update_theme(user, form).await;
    saved(jar, result, THEME_SAVED)
}

pub async fn update_privacy(
    State(state): State<Arc<GatewayState>>,
    CurrentUser { user }: CurrentUser,
    jar: CookieJar,
    PostedForm(form): PostedForm<PrivacyForm>,
) -> (CookieJar, Redirect) {
    let result = state.accounts.update_privacy(user, form.into()).await;
    saved(jar, result, PRIVACY_SAVED)
}

fn saved(
    jar: CookieJar,
    result: accountdesk_accounts::AccountResult<User>,
    message: &'static str,
) -> (CookieJar, Redirect) {
    let flash = match result {
        Ok(_) => Flash::success(message),
        Err(err) => {
            log_rejection(&err);
            Flash::error(err.to_string())
        }
    };

    (flash::push(jar, flash), Redirect::to("/preferences"))
}
