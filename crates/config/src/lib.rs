use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "accountdesk.toml",
    "config/accountdesk.toml",
    "../accountdesk.toml",
    "../config/accountdesk.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://accountdesk.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Session and cookie settings.
///
/// ```
/// use accountdesk_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert_eq!(auth.session_ttl_seconds, 86_400);
/// assert_eq!(auth.session_cookie, "accountdesk_session");
/// assert!(!auth.secure_cookies);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_session_ttl")]
    pub session_ttl_seconds: u64,
    #[serde(default = "AuthConfig::default_session_cookie")]
    pub session_cookie: String,
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: Self::default_session_ttl(),
            session_cookie: Self::default_session_cookie(),
            secure_cookies: false,
        }
    }
}

impl AuthConfig {
    /// Longest session lifetime honoured, ten years.
    pub const MAX_SESSION_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

    /// Configured session lifetime, capped at [`Self::MAX_SESSION_TTL_SECONDS`].
    ///
    /// ```
    /// use accountdesk_config::AuthConfig;
    ///
    /// let auth = AuthConfig {
    ///     session_ttl_seconds: u64::MAX,
    ///     ..AuthConfig::default()
    /// };
    /// assert_eq!(auth.effective_session_ttl(), AuthConfig::MAX_SESSION_TTL_SECONDS);
    /// ```
    pub fn effective_session_ttl(&self) -> u64 {
        self.session_ttl_seconds.min(Self::MAX_SESSION_TTL_SECONDS)
    }

    const fn default_session_ttl() -> u64 {
        86_400
    }

    fn default_session_cookie() -> String {
        "accountdesk_session".to_string()
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use accountdesk_config::load;
///
/// std::env::remove_var("ACCOUNTDESK_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let session_ttl = i64::try_from(defaults.auth.session_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.session_ttl_seconds", session_ttl)?
        .set_default("auth.session_cookie", defaults.auth.session_cookie.clone())?
        .set_default("auth.secure_cookies", defaults.auth.secure_cookies)?;

    let environment_overrides = config::Environment::with_prefix("ACCOUNTDESK").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("ACCOUNTDESK_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via ACCOUNTDESK_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.session_ttl_seconds > AuthConfig::MAX_SESSION_TTL_SECONDS {
        debug!(
            requested = config.auth.session_ttl_seconds,
            "capping auth.session_ttl_seconds"
        );
        config.auth.session_ttl_seconds = config.auth.effective_session_ttl();
    }

    if config.auth.session_cookie.trim().is_empty() {
        anyhow::bail!("invalid configuration: auth.session_cookie must not be empty");
    }

    debug!(?config, "loaded accountdesk configuration");
    Ok(config)
}
