//! User entity definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row};

use crate::types::{DatabaseResult, InvalidChoice};

/// Layout used when a stored user has no layout preference.
pub const DEFAULT_LAYOUT_STYLE: &str = "list";

/// User entity representing an account and its preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub preferences: Preferences,
    pub created_at: String,
    pub updated_at: String,
}

/// Preference fields stored alongside each user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub notification_frequency: NotificationFrequency,
    pub theme_color: String,
    pub font_style: String,
    pub layout_style: Option<String>,
    pub font_size: String,
    pub profile_visibility: ProfileVisibility,
    pub data_sharing: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: false,
            notification_frequency: NotificationFrequency::default(),
            theme_color: "blue".to_string(),
            font_style: "sans-serif".to_string(),
            layout_style: Some(DEFAULT_LAYOUT_STYLE.to_string()),
            font_size: "medium".to_string(),
            profile_visibility: ProfileVisibility::default(),
            data_sharing: false,
        }
    }
}

impl Preferences {
    /// Layout style with the list fallback applied.
    pub fn effective_layout_style(&self) -> &str {
        match self.layout_style.as_deref() {
            Some(style) if !style.is_empty() => style,
            _ => DEFAULT_LAYOUT_STYLE,
        }
    }
}

/// Data required to insert a new user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    pub(crate) fn from_row(row: &SqliteRow) -> DatabaseResult<Self> {
        let frequency: String = row.try_get("notification_frequency")?;
        let visibility: String = row.try_get("profile_visibility")?;

        Ok(Self {
            id: row.try_get("id")?,
            public_id: row.try_get("public_id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            preferences: Preferences {
                email_notifications: row.try_get("email_notifications")?,
                push_notifications: row.try_get("push_notifications")?,
                notification_frequency: frequency.parse()?,
                theme_color: row.try_get("theme_color")?,
                font_style: row.try_get("font_style")?,
                layout_style: row.try_get("layout_style")?,
                font_size: row.try_get("font_size")?,
                profile_visibility: visibility.parse()?,
                data_sharing: row.try_get("data_sharing")?,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// How often the user wants to receive notification digests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
    Never,
}

impl NotificationFrequency {
    pub const ALL: [NotificationFrequency; 4] = [
        NotificationFrequency::Daily,
        NotificationFrequency::Weekly,
        NotificationFrequency::Monthly,
        NotificationFrequency::Never,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationFrequency::Daily => "daily",
            NotificationFrequency::Weekly => "weekly",
            NotificationFrequency::Monthly => "monthly",
            NotificationFrequency::Never => "never",
        }
    }
}

impl FromStr for NotificationFrequency {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == s)
            .ok_or_else(|| InvalidChoice {
                kind: "notification frequency",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for NotificationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Who can see the user's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    #[default]
    Public,
    Private,
}

impl ProfileVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileVisibility::Public => "public",
            ProfileVisibility::Private => "private",
        }
    }
}

impl FromStr for ProfileVisibility {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(ProfileVisibility::Public),
            "private" => Ok(ProfileVisibility::Private),
            other => Err(InvalidChoice {
                kind: "profile visibility",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProfileVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
