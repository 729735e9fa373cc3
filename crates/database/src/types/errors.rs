//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("{field} is already in use")]
    UniqueViolation { field: String },

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Database query error: {0}")]
    Query(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                // SQLite reports "UNIQUE constraint failed: users.email"
                let field = db_err
                    .message()
                    .rsplit('.')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                DatabaseError::UniqueViolation { field }
            }
            other => DatabaseError::Query(other),
        }
    }
}

/// A stored enum column held a value outside its allowed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct InvalidChoice {
    pub kind: &'static str,
    pub value: String,
}

impl From<InvalidChoice> for DatabaseError {
    fn from(err: InvalidChoice) -> Self {
        DatabaseError::InvalidData(err.to_string())
    }
}
