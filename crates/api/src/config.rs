//! Runtime configuration read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use invoicebook_infra::notification::EmailSettings;
use invoicebook_infra::{DatabaseConfig, DatabaseKind};

pub const BIND_VAR: &str = "INVOICEBOOK_BIND";
pub const DATABASE_VAR: &str = "INVOICEBOOK_DATABASE";
pub const DATABASE_FILE_VAR: &str = "INVOICEBOOK_DATABASE_FILE";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const AUTH_USER_VAR: &str = "INVOICEBOOK_AUTH_USER";
pub const AUTH_PASSWORD_VAR: &str = "INVOICEBOOK_AUTH_PASSWORD";
pub const REPORT_EMAIL_VAR: &str = "INVOICEBOOK_REPORT_EMAIL";
pub const REPORT_ENABLED_VAR: &str = "INVOICEBOOK_REPORT_ENABLED";

const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{present} is set but {missing} is not")]
    IncompleteCredentials {
        present: &'static str,
        missing: &'static str,
    },
}

/// Username/password pair accepted by the Basic auth middleware.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub database: DatabaseConfig,
    pub email: EmailSettings,
    /// `None` leaves the invoice routes open.
    pub credentials: Option<BasicCredentials>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from `lookup`, which maps a variable name to its
    /// value. Unset and blank variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.trim().parse().map_err(|e| ConfigError::Invalid {
            key: BIND_VAR,
            value: bind_raw.clone(),
            reason: format!("{e}"),
        })?;

        let mut database = DatabaseConfig::default();
        if let Some(raw) = get(DATABASE_VAR) {
            database.kind = raw.parse::<DatabaseKind>().map_err(|e| ConfigError::Invalid {
                key: DATABASE_VAR,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(path) = get(DATABASE_FILE_VAR) {
            database.file_path = PathBuf::from(path);
        }
        if let Some(url) = get(DATABASE_URL_VAR) {
            database.url = url;
        }

        let mut email = EmailSettings::default();
        if let Some(recipient) = get(REPORT_EMAIL_VAR) {
            email.recipient = recipient;
        }
        if let Some(raw) = get(REPORT_ENABLED_VAR) {
            email.report_enabled = parse_bool(REPORT_ENABLED_VAR, &raw)?;
        }

        let credentials = match (get(AUTH_USER_VAR), get(AUTH_PASSWORD_VAR)) {
            (Some(username), Some(password)) => Some(BasicCredentials { username, password }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::IncompleteCredentials {
                    present: AUTH_USER_VAR,
                    missing: AUTH_PASSWORD_VAR,
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteCredentials {
                    present: AUTH_PASSWORD_VAR,
                    missing: AUTH_USER_VAR,
                });
            }
        };

        Ok(Self {
            bind,
            database,
            email,
            credentials,
        })
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
