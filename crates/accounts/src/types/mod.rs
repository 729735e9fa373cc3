//! Request, response and error types for the account service.

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{AccountError, AccountResult, ErrorKind};
pub use requests::{
    AccountSettingsRequest, LoginRequest, NotificationUpdate, PrivacyUpdate, RegisterRequest,
    ThemeUpdate,
};
pub use responses::{AccountUpdate, PreferencesView, PrivacyView, ThemeView};
