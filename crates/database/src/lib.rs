//! accountdesk database crate
//!
//! Connection management, embedded migrations, the `User` entity and the
//! `UserRepository` used by the account services.

use accountdesk_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::{run_migrations, MIGRATOR};

pub use repos::UserRepository;

pub use entities::{
    NewUser, NotificationFrequency, Preferences, ProfileVisibility, User, DEFAULT_LAYOUT_STYLE,
};

pub use types::{DatabaseError, DatabaseResult, InvalidChoice};

pub use sqlx::SqlitePool;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
