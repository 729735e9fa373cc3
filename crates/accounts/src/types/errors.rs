//! Error types for account and preference operations.
//!
//! Display strings double as the flash messages shown to the user.

use accountdesk_database::DatabaseError;
use thiserror::Error;

pub type AccountResult<T> = Result<T, AccountError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("All fields are required.")]
    MissingFields,

    #[error("Passwords do not match!")]
    PasswordMismatch,

    #[error("Username already taken! Please choose another.")]
    UsernameTaken,

    #[error("Email already registered!")]
    EmailTaken,

    #[error("Username already taken. Please choose another.")]
    UsernameInUse,

    #[error("Email is already in use. Please use a different email.")]
    EmailInUse,

    #[error("Both email and password are required.")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please enter your current password to change it.")]
    OldPasswordRequired,

    #[error("Old password is incorrect.")]
    IncorrectOldPassword,

    #[error("New passwords do not match!")]
    NewPasswordMismatch,

    #[error("Please enter a new password.")]
    NewPasswordRequired,

    #[error("New password cannot be the same as the old password.")]
    PasswordUnchanged,

    #[error("Invalid notification frequency selected.")]
    InvalidFrequency,

    #[error("Invalid profile visibility choice.")]
    InvalidVisibility,

    #[error("User not found.")]
    UserNotFound,

    #[error("An error occurred {action}: {cause}")]
    Persistence { action: &'static str, cause: String },
}

/// Coarse classification used for logging and status decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Auth,
    Persistence,
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::MissingFields
            | AccountError::PasswordMismatch
            | AccountError::MissingCredentials
            | AccountError::OldPasswordRequired
            | AccountError::NewPasswordMismatch
            | AccountError::NewPasswordRequired
            | AccountError::PasswordUnchanged
            | AccountError::InvalidFrequency
            | AccountError::InvalidVisibility => ErrorKind::Validation,
            AccountError::UsernameTaken
            | AccountError::EmailTaken
            | AccountError::UsernameInUse
            | AccountError::EmailInUse => ErrorKind::Conflict,
            AccountError::InvalidCredentials
            | AccountError::IncorrectOldPassword
            | AccountError::UserNotFound => ErrorKind::Auth,
            AccountError::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    pub(crate) fn persistence(action: &'static str, cause: impl ToString) -> Self {
        AccountError::Persistence {
            action,
            cause: cause.to_string(),
        }
    }

    /// Map a store failure, keeping unique-constraint races as conflicts.
    pub(crate) fn from_store(action: &'static str, err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation { ref field } if field == "username" => {
                AccountError::UsernameTaken
            }
            DatabaseError::UniqueViolation { ref field } if field == "email" => {
                AccountError::EmailTaken
            }
            other => AccountError::persistence(action, other),
        }
    }

    /// [`Self::from_store`] with the wording used when editing an existing account.
    pub(crate) fn from_settings_store(action: &'static str, err: DatabaseError) -> Self {
        match Self::from_store(action, err) {
            AccountError::UsernameTaken => AccountError::UsernameInUse,
            AccountError::EmailTaken => AccountError::EmailInUse,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violations_become_conflicts() {
        let err = AccountError::from_store(
            "during registration",
            DatabaseError::UniqueViolation {
                field: "email".to_string(),
            },
        );
        assert_eq!(err, AccountError::EmailTaken);
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = AccountError::from_store(
            "during registration",
            DatabaseError::UniqueViolation {
                field: "username".to_string(),
            },
        );
        assert_eq!(err, AccountError::UsernameTaken);

        let err = AccountError::from_settings_store(
            "while updating account settings",
            DatabaseError::UniqueViolation {
                field: "email".to_string(),
            },
        );
        assert_eq!(err, AccountError::EmailInUse);
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_registration_and_settings_use_their_own_wording() {
        assert_eq!(
            AccountError::UsernameTaken.to_string(),
            "Username already taken! Please choose another."
        );
        assert_eq!(AccountError::EmailTaken.to_string(), "Email already registered!");
        assert_eq!(
            AccountError::UsernameInUse.to_string(),
            "Username already taken. Please choose another."
        );
        assert_eq!(
            AccountError::EmailInUse.to_string(),
            "Email is already in use. Please use a different email."
        );
        assert_eq!(AccountError::PasswordMismatch.to_string(), "Passwords do not match!");
        assert_eq!(
            AccountError::NewPasswordMismatch.to_string(),
            "New passwords do not match!"
        );
    }

    #[test]
    fn test_persistence_message_includes_cause() {
        let err = AccountError::from_store(
            "while updating account settings",
            DatabaseError::ConnectionError("disk full".to_string()),
        );

        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(
            err.to_string(),
            "An error occurred while updating account settings: Database connection error: disk full"
        );
    }

    #[test]
    fn test_credential_errors_do_not_reveal_which_part_failed() {
        assert_eq!(
            AccountError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(AccountError::InvalidCredentials.kind(), ErrorKind::Auth);
    }
}
