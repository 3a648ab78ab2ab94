use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thrush_core::groups::GROUP_REGISTERED_USERS;
use thrush_core::permissions::{default_templates, parse_templates, PermissionTemplate};
use thrush_core::placeholder::{
    category_rules, PlaceholderRule, DEFAULT_DELETED_POST_CATEGORY_NAME,
    DEFAULT_DELETED_PRODUCT_CATEGORY_NAME,
};
use thrush_core::rating::{StarBounds, DEFAULT_STAR_MAX_VALUE, DEFAULT_STAR_MIN_VALUE};
use thrush_core::verification::{
    CodeCipher, CodeRange, DEFAULT_CODE_LENGTH, DEFAULT_CODE_LIFE_TIME_SECS,
};

use crate::auth::jwt::JwtConfig;

/// Error raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Read a required variable. Empty values count as missing.
pub(crate) fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

/// Read and parse an optional variable, falling back to `default`.
pub(crate) fn parse_or<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn string_or(var: &'static str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub lifecycle: LifecycleConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// See [`JwtConfig::from_env`] and [`LifecycleConfig::from_env`] for the
    /// nested sections.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = string_or("HOST", "0.0.0.0");
        let port: u16 = parse_or("PORT", 3000)?;

        let cors_origins: Vec<String> = string_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_or("REQUEST_TIMEOUT_SECS", 30)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env()?,
            lifecycle: LifecycleConfig::from_env()?,
        })
    }
}

/// Settings for the data lifecycle: on-create hooks, edge guards and
/// placeholder redirection.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub permission_templates: Vec<PermissionTemplate>,
    pub star_bounds: StarBounds,
    pub default_user_group: String,
    pub code_range: CodeRange,
    pub code_life_time: Duration,
    pub code_cipher: CodeCipher,
    pub placeholder_rules: Vec<PlaceholderRule>,
}

impl LifecycleConfig {
    /// | Env Var                         | Default                                    |
    /// |---------------------------------|--------------------------------------------|
    /// | `PERMISSION_TEMPLATES`          | `{model}.view,{model}.change,{model}.delete,{model}.approve` |
    /// | `STAR_MIN_VALUE`                | `1`                                        |
    /// | `STAR_MAX_VALUE`                | `10`                                       |
    /// | `DEFAULT_USER_GROUP`            | `registered_users`                         |
    /// | `VERIFY_CODE_LENGTH`            | `6`                                        |
    /// | `VERIFY_CODE_LIFE_TIME`         | `180` (seconds)                            |
    /// | `VERIFICATION_KEY`              | **required**, base64 of 32 bytes           |
    /// | `DELETED_POST_CATEGORY_NAME`    | `__deleted_category`                       |
    /// | `DELETED_PRODUCT_CATEGORY_NAME` | `__deleted_product`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        let permission_templates = match std::env::var("PERMISSION_TEMPLATES") {
            Ok(csv) => parse_templates(&csv).map_err(|e| ConfigError::Invalid {
                var: "PERMISSION_TEMPLATES",
                reason: e.to_string(),
            })?,
            Err(_) => default_templates(),
        };

        let star_bounds = StarBounds::new(
            parse_or("STAR_MIN_VALUE", DEFAULT_STAR_MIN_VALUE)?,
            parse_or("STAR_MAX_VALUE", DEFAULT_STAR_MAX_VALUE)?,
        )
        .map_err(|e| ConfigError::Invalid {
            var: "STAR_MIN_VALUE",
            reason: e.to_string(),
        })?;

        let code_range = CodeRange::for_digits(parse_or("VERIFY_CODE_LENGTH", DEFAULT_CODE_LENGTH)?)
            .map_err(|e| ConfigError::Invalid {
                var: "VERIFY_CODE_LENGTH",
                reason: e.to_string(),
            })?;

        let code_life_time = Duration::from_secs(parse_or(
            "VERIFY_CODE_LIFE_TIME",
            DEFAULT_CODE_LIFE_TIME_SECS,
        )?);

        let code_cipher = CodeCipher::from_base64_key(&required("VERIFICATION_KEY")?).map_err(
            |e| ConfigError::Invalid {
                var: "VERIFICATION_KEY",
                reason: e.to_string(),
            },
        )?;

        let placeholder_rules = category_rules(
            &string_or("DELETED_POST_CATEGORY_NAME", DEFAULT_DELETED_POST_CATEGORY_NAME),
            &string_or(
                "DELETED_PRODUCT_CATEGORY_NAME",
                DEFAULT_DELETED_PRODUCT_CATEGORY_NAME,
            ),
        );

        Ok(Self {
            permission_templates,
            star_bounds,
            default_user_group: string_or("DEFAULT_USER_GROUP", GROUP_REGISTERED_USERS),
            code_range,
            code_life_time,
            code_cipher,
            placeholder_rules,
        })
    }
}
