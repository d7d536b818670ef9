//! Application configuration
//!
//! Settings are read from the environment (and `.env`, when present).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Longest accepted session lifetime, in days
pub const MAX_SESSION_MAX_AGE_DAYS: i64 = 3650;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    /// Lifetime of the `sessionId` cookie
    pub session_max_age_days: i64,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3333,
            session_max_age_days: 7,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    /// Build the configuration from `DAILY_DIET_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_path = std::env::var("DAILY_DIET_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        Ok(Self {
            database_path,
            host: parse_var("DAILY_DIET_HOST", defaults.host)?,
            port: parse_var("DAILY_DIET_PORT", defaults.port)?,
            session_max_age_days: parse_session_days(
                "DAILY_DIET_SESSION_MAX_AGE_DAYS",
                defaults.session_max_age_days,
            )?,
            bcrypt_cost: parse_var("DAILY_DIET_BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse an environment variable, falling back to a default when unset
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            value,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Parse a session lifetime in days; must lie in `1..=MAX_SESSION_MAX_AGE_DAYS`
fn parse_session_days(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    let days = parse_var(name, default)?;
    if (1..=MAX_SESSION_MAX_AGE_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(ConfigError::InvalidValue {
            name,
            value: days.to_string(),
            reason: format!("expected 1 to {MAX_SESSION_MAX_AGE_DAYS} days"),
        })
    }
}

/// Default database location: `<project>/data/daily_diet.db`
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("daily_diet.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_uses_default_when_unset() {
        let port: u16 = parse_var("DAILY_DIET_TEST_UNSET_PORT", 4444).unwrap();
        assert_eq!(port, 4444);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        std::env::set_var("DAILY_DIET_TEST_BAD_PORT", "eighty");
        let err = parse_var::<u16>("DAILY_DIET_TEST_BAD_PORT", 80).unwrap_err();
        assert!(err.to_string().contains("DAILY_DIET_TEST_BAD_PORT"));
        std::env::remove_var("DAILY_DIET_TEST_BAD_PORT");
    }

    #[test]
    fn test_session_days_must_be_positive_and_bounded() {
        for (name, value) in [
            ("DAILY_DIET_TEST_SESSION_ZERO", "0"),
            ("DAILY_DIET_TEST_SESSION_NEGATIVE", "-3"),
            ("DAILY_DIET_TEST_SESSION_HUGE", "9223372036854775807"),
            ("DAILY_DIET_TEST_SESSION_TOO_LONG", "3651"),
        ] {
            std::env::set_var(name, value);
            let err = parse_session_days(name, 7).unwrap_err();
            assert!(err.to_string().contains(name), "{value} accepted");
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_session_days_accepts_valid_values() {
        assert_eq!(parse_session_days("DAILY_DIET_TEST_SESSION_UNSET", 7).unwrap(), 7);

        std::env::set_var("DAILY_DIET_TEST_SESSION_MONTH", "30");
        assert_eq!(parse_session_days("DAILY_DIET_TEST_SESSION_MONTH", 7).unwrap(), 30);
        std::env::remove_var("DAILY_DIET_TEST_SESSION_MONTH");
    }

    #[test]
    fn test_default_database_path_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("data/daily_diet.db"));
    }
}
