// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup into an
//! immutable [`AppConfig`], which is then handed to the components that
//! need it. Nothing reads the environment after that.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Token signing secret | **Required**, non-empty |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `BOOTSTRAP_USERNAME` | Initial teacher account username | none |
//! | `BOOTSTRAP_EMAIL` | Initial teacher account email | none |
//! | `BOOTSTRAP_PASSWORD` | Initial teacher account password | none |
//!
//! There is no default signing secret and no default account.

use crate::auth::SigningKey;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const BOOTSTRAP_USERNAME_ENV: &str = "BOOTSTRAP_USERNAME";
pub const BOOTSTRAP_EMAIL_ENV: &str = "BOOTSTRAP_EMAIL";
pub const BOOTSTRAP_PASSWORD_ENV: &str = "BOOTSTRAP_PASSWORD";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Secrets shorter than this start with a warning.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingSecret,
    #[error("JWT_SECRET must not be empty")]
    EmptySecret,
    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),
    #[error("invalid LOG_FORMAT value: {0:?} (expected `json` or `pretty`)")]
    InvalidLogFormat(String),
    #[error("bootstrap account needs all of BOOTSTRAP_USERNAME, BOOTSTRAP_EMAIL and BOOTSTRAP_PASSWORD")]
    IncompleteBootstrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::InvalidLogFormat(value.to_string())),
        }
    }
}

/// Teacher account created at startup.
#[derive(Clone)]
pub struct BootstrapAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub signing_key: SigningKey,
    pub log_format: LogFormat,
    pub bootstrap: Option<BootstrapAccount>,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::MissingSecret)?;
        let signing_key = SigningKey::new(secret).ok_or(ConfigError::EmptySecret)?;

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => LogFormat::parse(&raw)?,
            None => LogFormat::default(),
        };

        let bootstrap = match (
            lookup(BOOTSTRAP_USERNAME_ENV),
            lookup(BOOTSTRAP_EMAIL_ENV),
            lookup(BOOTSTRAP_PASSWORD_ENV),
        ) {
            (None, None, None) => None,
            (Some(username), Some(email), Some(password))
                if !username.is_empty() && !email.is_empty() && !password.is_empty() =>
            {
                Some(BootstrapAccount {
                    username,
                    email,
                    password,
                })
            }
            _ => return Err(ConfigError::IncompleteBootstrap),
        };

        Ok(Self {
            host,
            port,
            signing_key,
            log_format,
            bootstrap,
        })
    }

    /// Non-fatal problems worth logging at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.signing_key.len() < RECOMMENDED_SECRET_LEN {
            warnings.push(format!(
                "{JWT_SECRET_ENV} is shorter than the recommended {RECOMMENDED_SECRET_LEN} bytes"
            ));
        }
        warnings
    }
}
