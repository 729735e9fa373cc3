//! Read models rendered by the settings pages.

use accountdesk_database::{NotificationFrequency, ProfileVisibility, User};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferencesView {
    pub public_id: String,
    pub username: String,
    pub email: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub notification_frequency: NotificationFrequency,
    pub theme_color: String,
    pub font_style: String,
    pub layout_style: String,
    pub font_size: String,
    pub profile_visibility: ProfileVisibility,
    pub data_sharing: bool,
}

impl From<&User> for PreferencesView {
    fn from(user: &User) -> Self {
        let prefs = &user.preferences;
        Self {
            public_id: user.public_id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            email_notifications: prefs.email_notifications,
            push_notifications: prefs.push_notifications,
            notification_frequency: prefs.notification_frequency,
            theme_color: prefs.theme_color.clone(),
            font_style: prefs.font_style.clone(),
            layout_style: prefs.effective_layout_style().to_string(),
            font_size: prefs.font_size.clone(),
            profile_visibility: prefs.profile_visibility,
            data_sharing: prefs.data_sharing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeView {
    pub theme_color: String,
    pub font_style: String,
    pub layout_style: String,
    pub font_size: String,
}

impl From<&User> for ThemeView {
    fn from(user: &User) -> Self {
        let prefs = &user.preferences;
        Self {
            theme_color: prefs.theme_color.clone(),
            font_style: prefs.font_style.clone(),
            layout_style: prefs.effective_layout_style().to_string(),
            font_size: prefs.font_size.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivacyView {
    pub profile_visibility: ProfileVisibility,
    pub data_sharing: bool,
}

impl From<&User> for PrivacyView {
    fn from(user: &User) -> Self {
        Self {
            profile_visibility: user.preferences.profile_visibility,
            data_sharing: user.preferences.data_sharing,
        }
    }
}

/// Outcome of a successful account settings update.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountUpdate {
    Updated(User),
    /// The password was replaced; existing sessions must be ended.
    PasswordChanged(User),
}

impl AccountUpdate {
    pub fn user(&self) -> &User {
        match self {
            AccountUpdate::Updated(user) | AccountUpdate::PasswordChanged(user) => user,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AccountUpdate::Updated(_) => "Account settings updated successfully!",
            AccountUpdate::PasswordChanged(_) => {
                "Password updated successfully! Please log in again."
            }
        }
    }
}
