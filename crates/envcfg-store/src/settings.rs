//! Connection settings
//!
//! Settings come from `DB_*` environment variables, each with a default,
//! or from a `Host=..;Database=..;Username=..;Password=..;Port=..` string.

use crate::errors::{invalid_settings, Result};
use envcfg_core_types::Sensitive;
use sqlx::postgres::PgConnectOptions;

pub const ENV_HOST: &str = "DB_HOST";
pub const ENV_DATABASE: &str = "DB_DATABASE";
pub const ENV_USER: &str = "DB_USER";
pub const ENV_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_PORT: &str = "DB_PORT";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_DATABASE: &str = "yourdb";
pub const DEFAULT_USER: &str = "youruser";
pub const DEFAULT_PASSWORD: &str = "yourpass";
pub const DEFAULT_PORT: u16 = 5432;

/// Immutable description of where the PostgreSQL store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: Sensitive<String>,
    pub port: u16,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: Sensitive::new(DEFAULT_PASSWORD.to_string()),
            port: DEFAULT_PORT,
        }
    }
}

impl ConnectionSettings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    ///
    /// Unset variables take their default. `DB_PORT` also falls back to the
    /// default when it is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup(ENV_HOST).unwrap_or(defaults.host),
            database: lookup(ENV_DATABASE).unwrap_or(defaults.database),
            user: lookup(ENV_USER).unwrap_or(defaults.user),
            password: lookup(ENV_PASSWORD)
                .map(Sensitive::new)
                .unwrap_or(defaults.password),
            port: lookup(ENV_PORT)
                .as_deref()
                .and_then(parse_port)
                .unwrap_or(defaults.port),
        }
    }

    /// Parse a `Key=Value;...` connection string
    ///
    /// Keys are case-insensitive; missing keys take their default.
    ///
    /// # Errors
    /// Returns a `Connection` error for unknown keys, segments without `=`,
    /// or a port that is not a positive integer.
    pub fn parse(input: &str) -> Result<Self> {
        let mut settings = Self::default();

        for segment in input.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                invalid_settings(format!("expected Key=Value, found '{}'", segment))
            })?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "host" | "server" => settings.host = value,
                "database" => settings.database = value,
                "username" | "user" | "user id" => settings.user = value,
                "password" => settings.password = Sensitive::new(value),
                "port" => {
                    settings.port = parse_port(&value).ok_or_else(|| {
                        invalid_settings(format!("port must be a positive integer, found '{}'", value))
                    })?
                }
                other => {
                    return Err(invalid_settings(format!(
                        "unknown connection string key '{}'",
                        other
                    )))
                }
            }
        }

        Ok(settings)
    }

    /// Render the `Key=Value;...` form, password included
    pub fn connection_string(&self) -> String {
        self.render(self.password.expose())
    }

    /// Render the `Key=Value;...` form with the password masked
    pub fn redacted_connection_string(&self) -> String {
        self.render(&self.password.to_string())
    }

    fn render(&self, password: &str) -> String {
        format!(
            "Host={};Database={};Username={};Password={};Port={}",
            self.host, self.database, self.user, password, self.port
        )
    }

    /// Driver options for the PostgreSQL backend
    pub fn pg_connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose())
            .database(&self.database)
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port > 0)
}
