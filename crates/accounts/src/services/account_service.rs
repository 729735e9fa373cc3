//! Account service: registration, login checks and settings updates.

use accountdesk_auth::{hash_password, verify_password};
use accountdesk_database::{
    DatabaseResult, NewUser, NotificationFrequency, ProfileVisibility, User, UserRepository,
};
use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use crate::types::requests::present;
use crate::types::{
    AccountError, AccountResult, AccountSettingsRequest, AccountUpdate, LoginRequest,
    NotificationUpdate, PreferencesView, PrivacyUpdate, PrivacyView, RegisterRequest,
    ThemeUpdate, ThemeView,
};

/// Persistence seam used by [`AccountService`].
#[allow(async_fn_in_trait)]
pub trait UserStore {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;
    async fn username_taken(&self, username: &str, exclude_id: Option<i64>)
        -> DatabaseResult<bool>;
    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> DatabaseResult<bool>;
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;
    async fn save(&self, user: &User) -> DatabaseResult<User>;
}

impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        self.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        self.find_by_email(email).await
    }

    async fn username_taken(
        &self,
        username: &str,
        exclude_id: Option<i64>,
    ) -> DatabaseResult<bool> {
        self.username_taken(username, exclude_id).await
    }

    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> DatabaseResult<bool> {
        self.email_taken(email, exclude_id).await
    }

    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        self.create(new_user).await
    }

    async fn save(&self, user: &User) -> DatabaseResult<User> {
        self.save(user).await
    }
}

// Checked on unknown emails so both login failures cost one argon2 verify.
static UNKNOWN_USER_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("accountdesk-unknown-user").ok());

const REGISTRATION: &str = "during registration";
const LOGIN: &str = "during login";
const LOADING: &str = "while loading your account";
const ACCOUNT_SETTINGS: &str = "while updating account settings";
const NOTIFICATION_SETTINGS: &str = "while updating notification settings";
const THEME_SETTINGS: &str = "while updating theme settings";
const PRIVACY_SETTINGS: &str = "while updating privacy settings";

pub struct AccountService<S> {
    store: S,
}

impl<S> AccountService<S>
where
    S: UserStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an account with default preferences.
    pub async fn register(&self, request: RegisterRequest) -> AccountResult<User> {
        let (Some(username), Some(email), Some(password), Some(password2)) = (
            present(&request.username),
            present(&request.email),
            present(&request.password),
            present(&request.password2),
        ) else {
            return Err(AccountError::MissingFields);
        };

        if password != password2 {
            return Err(AccountError::PasswordMismatch);
        }

        let store_err = |err| AccountError::from_store(REGISTRATION, err);
        if self.store.username_taken(username, None).await.map_err(store_err)? {
            return Err(AccountError::UsernameTaken);
        }
        if self.store.email_taken(email, None).await.map_err(store_err)? {
            return Err(AccountError::EmailTaken);
        }

        let password_hash =
            hash_password(password).map_err(|err| AccountError::persistence(REGISTRATION, err))?;

        let user = self
            .store
            .create(&NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(store_err)?;

        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Check an email/password pair. Unknown email and wrong password are
    /// reported identically.
    pub async fn verify_credentials(&self, request: LoginRequest) -> AccountResult<User> {
        let (Some(email), Some(password)) =
            (present(&request.email), present(&request.password))
        else {
            return Err(AccountError::MissingCredentials);
        };

        let Some(user) = self
            .store
            .find_by_email(email)
            .await
            .map_err(|err| AccountError::from_store(LOGIN, err))?
        else {
            if let Some(hash) = UNKNOWN_USER_HASH.as_deref() {
                let _ = verify_password(password, hash);
            }
            debug!("login attempt for unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                debug!(user_id = user.id, "login attempt with wrong password");
                Err(AccountError::InvalidCredentials)
            }
            Err(err) => {
                warn!(user_id = user.id, error = %err, "stored password hash is unreadable");
                Err(AccountError::InvalidCredentials)
            }
        }
    }

    pub async fn current_user(&self, user_id: i64) -> AccountResult<User> {
        self.store
            .find_by_id(user_id)
            .await
            .map_err(|err| AccountError::from_store(LOADING, err))?
            .ok_or(AccountError::UserNotFound)
    }

    pub fn preferences(&self, user: &User) -> PreferencesView {
        PreferencesView::from(user)
    }

    pub fn theme(&self, user: &User) -> ThemeView {
        ThemeView::from(user)
    }

    pub fn privacy(&self, user: &User) -> PrivacyView {
        PrivacyView::from(user)
    }

    /// Update username/email and optionally change the password.
    ///
    /// Nothing is written unless every check passes.
    pub async fn update_account(
        &self,
        mut user: User,
        request: AccountSettingsRequest,
    ) -> AccountResult<AccountUpdate> {
        let username = present(&request.username)
            .unwrap_or(user.username.as_str())
            .to_string();
        let email = present(&request.email)
            .unwrap_or(user.email.as_str())
            .to_string();

        let mut new_hash = None;
        if request.wants_password_change() {
            let Some(old_password) = present(&request.old_password) else {
                return Err(AccountError::OldPasswordRequired);
            };

            let matches = verify_password(old_password, &user.password_hash)
                .map_err(|err| AccountError::persistence(ACCOUNT_SETTINGS, err))?;
            if !matches {
                return Err(AccountError::IncorrectOldPassword);
            }

            let new_password = present(&request.new_password);
            if new_password != present(&request.confirm_password) {
                return Err(AccountError::NewPasswordMismatch);
            }
            let Some(new_password) = new_password else {
                return Err(AccountError::NewPasswordRequired);
            };
            if new_password == old_password {
                return Err(AccountError::PasswordUnchanged);
            }

            new_hash = Some(
                hash_password(new_password)
                    .map_err(|err| AccountError::persistence(ACCOUNT_SETTINGS, err))?,
            );
        }

        let store_err = |err| AccountError::from_settings_store(ACCOUNT_SETTINGS, err);
        if self
            .store
            .username_taken(&username, Some(user.id))
            .await
            .map_err(store_err)?
        {
            return Err(AccountError::UsernameInUse);
        }
        if self
            .store
            .email_taken(&email, Some(user.id))
            .await
            .map_err(store_err)?
        {
            return Err(AccountError::EmailInUse);
        }

        user.username = username;
        user.email = email;
        let password_updated = new_hash.is_some();
        if let Some(hash) = new_hash {
            user.password_hash = hash;
        }

        let saved = self.store.save(&user).await.map_err(store_err)?;

        if password_updated {
            info!(user_id = saved.id, "password changed");
            Ok(AccountUpdate::PasswordChanged(saved))
        } else {
            info!(user_id = saved.id, username = %saved.username, "account settings updated");
            Ok(AccountUpdate::Updated(saved))
        }
    }

    pub async fn update_notifications(
        &self,
        mut user: User,
        update: NotificationUpdate,
    ) -> AccountResult<User> {
        let frequency = present(&update.notification_frequency)
            .and_then(|value| value.parse::<NotificationFrequency>().ok())
            .ok_or(AccountError::InvalidFrequency)?;

        let prefs = &mut user.preferences;
        prefs.email_notifications = update.email_notifications;
        prefs.push_notifications = update.push_notifications;
        prefs.notification_frequency = frequency;

        let saved = self
            .store
            .save(&user)
            .await
            .map_err(|err| AccountError::from_store(NOTIFICATION_SETTINGS, err))?;

        debug!(user_id = saved.id, frequency = %frequency, "notification settings updated");
        Ok(saved)
    }

    /// Apply whichever theme fields were supplied; the rest keep their value.
    pub async fn update_theme(&self, mut user: User, update: ThemeUpdate) -> AccountResult<User> {
        let prefs = &mut user.preferences;
        if let Some(color) = present(&update.theme_color) {
            prefs.theme_color = color.to_string();
        }
        if let Some(font) = present(&update.font_style) {
            prefs.font_style = font.to_string();
        }
        if let Some(layout) = present(&update.layout_style) {
            prefs.layout_style = Some(layout.to_string());
        }
        if let Some(size) = present(&update.font_size) {
            prefs.font_size = size.to_string();
        }

        let saved = self
            .store
            .save(&user)
            .await
            .map_err(|err| AccountError::from_store(THEME_SETTINGS, err))?;

        debug!(user_id = saved.id, "theme settings updated");
        Ok(saved)
    }

    pub async fn update_privacy(
        &self,
        mut user: User,
        update: PrivacyUpdate,
    ) -> AccountResult<User> {
        let visibility = present(&update.profile_visibility)
            .and_then(|value| value.parse::<ProfileVisibility>().ok())
            .ok_or(AccountError::InvalidVisibility)?;

        user.preferences.profile_visibility = visibility;
        user.preferences.data_sharing = update.data_sharing;

        let saved = self
            .store
            .save(&user)
            .await
            .map_err(|err| AccountError::from_store(PRIVACY_SETTINGS, err))?;

        debug!(user_id = saved.id, visibility = %visibility, "privacy settings updated");
        Ok(saved)
    }
}
