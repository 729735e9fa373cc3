//! Form payloads accepted by the account service.
//!
//! Text fields are `Option<String>`; an empty string counts as absent.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password2: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Identity fields plus an optional password change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountSettingsRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

impl AccountSettingsRequest {
    pub fn wants_password_change(&self) -> bool {
        present(&self.old_password).is_some()
            || present(&self.new_password).is_some()
            || present(&self.confirm_password).is_some()
    }
}

/// Checkbox state is already resolved to `bool` by the caller.
#[derive(Debug, Clone, Default)]
pub struct NotificationUpdate {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub notification_frequency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeUpdate {
    pub theme_color: Option<String>,
    pub font_style: Option<String>,
    pub layout_style: Option<String>,
    pub font_size: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PrivacyUpdate {
    pub profile_visibility: Option<String>,
    pub data_sharing: bool,
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_count_as_absent() {
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some(String::new())), None);
        assert_eq!(present(&Some("x".to_string())), Some("x"));
    }

    #[test]
    fn password_change_detected_from_any_field() {
        let mut request = AccountSettingsRequest::default();
        assert!(!request.wants_password_change());

        request.confirm_password = Some(String::new());
        assert!(!request.wants_password_change());

        request.confirm_password = Some("secret".to_string());
        assert!(request.wants_password_change());
    }
}
