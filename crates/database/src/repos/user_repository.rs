//! User repository for database operations.

use chrono::Utc;
use cuid2::CuidConstructor;
use once_cell::sync::Lazy;
use sqlx::SqlitePool;
use tracing::debug;

use crate::entities::{NewUser, Preferences, User};
use crate::types::{DatabaseError, DatabaseResult};

static CUID: Lazy<CuidConstructor> = Lazy::new(CuidConstructor::new);

const USER_COLUMNS: &str = "id, public_id, username, email, password_hash, \
     email_notifications, push_notifications, notification_frequency, \
     theme_color, font_style, layout_style, font_size, \
     profile_visibility, data_sharing, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(User::from_row).transpose()
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(User::from_row).transpose()
    }

    /// Whether another user already holds `username`.
    ///
    /// `exclude_id` skips the acting user's own row so an unchanged username
    /// does not collide with itself.
    pub async fn username_taken(
        &self,
        username: &str,
        exclude_id: Option<i64>,
    ) -> DatabaseResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? AND (? IS NULL OR id != ?))",
        )
        .bind(username)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    /// Whether another user already holds `email`.
    pub async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> DatabaseResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND (? IS NULL OR id != ?))",
        )
        .bind(email)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    /// Insert a new user with default preferences
    pub async fn create(&self, request: &NewUser) -> DatabaseResult<User> {
        let now = Utc::now().to_rfc3339();
        let public_id = CUID.create_id();
        let prefs = Preferences::default();

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                public_id, username, email, password_hash,
                email_notifications, push_notifications, notification_frequency,
                theme_color, font_style, layout_style, font_size,
                profile_visibility, data_sharing, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&public_id)
        .bind(&request.username)
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(prefs.email_notifications)
        .bind(prefs.push_notifications)
        .bind(prefs.notification_frequency.as_str())
        .bind(&prefs.theme_color)
        .bind(&prefs.font_style)
        .bind(&prefs.layout_style)
        .bind(&prefs.font_size)
        .bind(prefs.profile_visibility.as_str())
        .bind(prefs.data_sharing)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(user_id = id, username = %request.username, "inserted user");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {id}")))
    }

    /// Persist every mutable column of `user` and return the stored row
    pub async fn save(&self, user: &User) -> DatabaseResult<User> {
        let now = Utc::now().to_rfc3339();
        let prefs = &user.preferences;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = ?, email = ?, password_hash = ?,
                email_notifications = ?, push_notifications = ?, notification_frequency = ?,
                theme_color = ?, font_style = ?, layout_style = ?, font_size = ?,
                profile_visibility = ?, data_sharing = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(prefs.email_notifications)
        .bind(prefs.push_notifications)
        .bind(prefs.notification_frequency.as_str())
        .bind(&prefs.theme_color)
        .bind(&prefs.font_style)
        .bind(&prefs.layout_style)
        .bind(&prefs.font_size)
        .bind(prefs.profile_visibility.as_str())
        .bind(prefs.data_sharing)
        .bind(&now)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", user.id)));
        }

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user.id)))
    }

    /// List users ordered by creation
    pub async fn list(&self, limit: u32) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(User::from_row).collect()
    }

    /// Total number of users
    pub async fn count(&self) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
