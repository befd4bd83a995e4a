//! Shared configuration structures.
//!
//! Every struct loads from the process environment through `from_env`, or
//! from any key lookup through `from_lookup` (used by tests).

use chrono::Duration;
use domain::{
    DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_MAIL_FROM, DEFAULT_REFRESH_TOKEN_HOURS,
    MIN_TOKEN_SECRET_LENGTH,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{key} has an invalid value: {raw:?}"))),
        None => Ok(default),
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(env_lookup)
    }

    /// `SERVER_PORT` wins over the bare `PORT` fallback.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let defaults = Self::default();
        let port_key = if lookup("SERVER_PORT").is_some() {
            "SERVER_PORT"
        } else {
            "PORT"
        };

        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, port_key, defaults.port)?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration.
#[derive(Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::config("DATABASE_URL must be set"))?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;
        let min_connections = parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1)?;

        if max_connections == 0 || min_connections > max_connections {
            return Err(AppError::config(
                "DATABASE_MAX_CONNECTIONS must be positive and not below DATABASE_MIN_CONNECTIONS",
            ));
        }

        Ok(Self {
            url,
            max_connections,
            min_connections,
        })
    }
}

/// Signing secret and lifetime of one token kind.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub lifetime: Duration,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Token configuration for the auth service.
///
/// Access and refresh tokens are signed with different secrets, so a token
/// of one kind never verifies as the other.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access: TokenSettings,
    pub refresh: TokenSettings,
}

impl AuthConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let access_secret = required_secret(&lookup, "ACCESS_TOKEN_SECRET")?;
        let refresh_secret = required_secret(&lookup, "REFRESH_TOKEN_SECRET")?;

        let access_minutes = parse_or(
            &lookup,
            "ACCESS_TOKEN_EXPIRATION_MINUTES",
            DEFAULT_ACCESS_TOKEN_MINUTES,
        )?;
        let refresh_hours = parse_or(
            &lookup,
            "REFRESH_TOKEN_EXPIRATION_HOURS",
            DEFAULT_REFRESH_TOKEN_HOURS,
        )?;

        Self::new(
            TokenSettings {
                secret: access_secret,
                lifetime: positive(
                    access_minutes,
                    Duration::try_minutes,
                    "ACCESS_TOKEN_EXPIRATION_MINUTES",
                )?,
            },
            TokenSettings {
                secret: refresh_secret,
                lifetime: positive(
                    refresh_hours,
                    Duration::try_hours,
                    "REFRESH_TOKEN_EXPIRATION_HOURS",
                )?,
            },
        )
    }

    /// Build from explicit settings, enforcing the secret rules.
    pub fn new(access: TokenSettings, refresh: TokenSettings) -> AppResult<Self> {
        for (name, settings) in [("access", &access), ("refresh", &refresh)] {
            if settings.secret.chars().count() < MIN_TOKEN_SECRET_LENGTH {
                return Err(AppError::config(format!(
                    "{name} token secret must be at least {MIN_TOKEN_SECRET_LENGTH} characters"
                )));
            }
            if settings.lifetime <= Duration::zero() {
                return Err(AppError::config(format!(
                    "{name} token lifetime must be positive"
                )));
            }
        }
        if access.secret == refresh.secret {
            return Err(AppError::config(
                "access and refresh token secrets must differ",
            ));
        }

        Ok(Self { access, refresh })
    }
}

fn required_secret<F>(lookup: &F, key: &str) -> AppResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| AppError::config(format!("{key} must be set")))
}

fn positive(
    value: i64,
    to_duration: fn(i64) -> Option<Duration>,
    key: &str,
) -> AppResult<Duration> {
    if value <= 0 {
        return Err(AppError::config(format!("{key} must be positive")));
    }
    to_duration(value).ok_or_else(|| AppError::config(format!("{key} is out of range")))
}

/// Outgoing mail configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Sender address of notification emails
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: DEFAULT_MAIL_FROM.to_string(),
        }
    }
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            from: lookup("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
        }
    }
}
