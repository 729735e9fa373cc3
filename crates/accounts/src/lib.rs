//! # accountdesk accounts
//!
//! Registration, credential checks and the settings state machines. Each
//! operation takes the acting user plus a typed form, validates it, mutates
//! the record and persists it through a [`UserStore`].
//!
//! ```no_run
//! use accountdesk_accounts::{AccountService, MemoryUserStore, RegisterRequest};
//!
//! # async fn demo() -> Result<(), accountdesk_accounts::AccountError> {
//! let service = AccountService::new(MemoryUserStore::new());
//! let user = service
//!     .register(RegisterRequest {
//!         username: Some("alice".into()),
//!         email: Some("alice@example.com".into()),
//!         password: Some("hunter22".into()),
//!         password2: Some("hunter22".into()),
//!     })
//!     .await?;
//! assert_eq!(user.preferences.theme_color, "blue");
//! # Ok(())
//! # }
//! ```

pub mod services;
pub mod types;

pub use accountdesk_database::{
    NotificationFrequency, Preferences, ProfileVisibility, User, UserRepository,
};
pub use services::{AccountService, MemoryUserStore, UserStore};
pub use types::{
    AccountError, AccountResult, AccountSettingsRequest, AccountUpdate, ErrorKind, LoginRequest,
    NotificationUpdate, PreferencesView, PrivacyUpdate, PrivacyView, RegisterRequest,
    ThemeUpdate, ThemeView,
};
