//! Application configuration, read from the environment.

use chrono::{Duration, Utc};
use di::{inject, injectable};
use log::warn;
use std::env;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite:notecards.db?mode=rwc";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub allowed_origins: Vec<String>,
    pub session_ttl_hours: i64,
    /// Accounts allowed to use the admin endpoints. Empty means every signed-in account.
    pub admin_emails: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            allowed_origins: split_list(DEFAULT_ALLOWED_ORIGINS),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            admin_emails: Vec::new(),
        }
    }
}

#[injectable]
impl AppConfig {
    #[inject]
    pub fn create() -> AppConfig {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }
}

impl AppConfig {
    /// Builds the configuration from any key lookup, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppConfig {
        let defaults = AppConfig::default();

        AppConfig {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|origins| split_list(&origins))
                .unwrap_or(defaults.allowed_origins),
            session_ttl_hours: session_ttl_or_default(parse_or(
                "SESSION_TTL_HOURS",
                lookup("SESSION_TTL_HOURS"),
                defaults.session_ttl_hours,
            )),
            admin_emails: lookup("ADMIN_EMAILS")
                .map(|emails| {
                    split_list(&emails)
                        .into_iter()
                        .map(|email| email.to_lowercase())
                        .collect()
                })
                .unwrap_or(defaults.admin_emails),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::try_hours(self.session_ttl_hours)
            .unwrap_or_else(|| Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }

    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails.is_empty()
            || self
                .admin_emails
                .iter()
                .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("invalid value {raw:?} for {key}, using {default}");
            default
        }),
    }
}

/// At least one hour, and short enough that a session issued now has a representable expiry.
fn session_ttl_or_default(hours: i64) -> i64 {
    let hours = hours.max(1);
    let fits = Duration::try_hours(hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .is_some();

    if fits {
        hours
    } else {
        warn!("SESSION_TTL_HOURS={hours} is too large, using {DEFAULT_SESSION_TTL_HOURS}");
        DEFAULT_SESSION_TTL_HOURS
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]);

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.session_ttl_hours, 24);
        assert!(config.admin_emails.is_empty());
    }

    #[test]
    fn test_values_are_read_from_lookup() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SESSION_TTL_HOURS", "48"),
            ("ALLOWED_ORIGINS", "https://cards.example, ,https://www.cards.example"),
            ("ADMIN_EMAILS", "Boss@Example.com"),
        ]);

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.session_ttl(), Duration::hours(48));
        assert_eq!(
            config.allowed_origins,
            vec!["https://cards.example", "https://www.cards.example"]
        );
        assert_eq!(config.admin_emails, vec!["boss@example.com"]);
    }

    #[test]
    fn test_invalid_number_falls_back_to_default() {
        let config = config_from(&[("SESSION_TTL_HOURS", "forever")]);
        assert_eq!(config.session_ttl_hours, DEFAULT_SESSION_TTL_HOURS);
    }

    #[test]
    fn test_oversized_session_ttl_falls_back_to_default() {
        for raw in ["3000000000", "9223372036854775807"] {
            let config = config_from(&[("SESSION_TTL_HOURS", raw)]);

            assert_eq!(config.session_ttl_hours, DEFAULT_SESSION_TTL_HOURS, "{raw}");
            let expires_at = Utc::now() + config.session_ttl();
            assert!(expires_at > Utc::now());
        }
    }

    #[test]
    fn test_session_ttl_is_at_least_an_hour() {
        let config = config_from(&[("SESSION_TTL_HOURS", "-5")]);
        assert_eq!(config.session_ttl(), Duration::hours(1));
    }

    #[test]
    fn test_admin_check() {
        let open = config_from(&[]);
        assert!(open.is_admin("anyone@example.com"));

        let restricted = config_from(&[("ADMIN_EMAILS", "admin@example.com")]);
        assert!(restricted.is_admin("ADMIN@example.com"));
        assert!(!restricted.is_admin("student@example.com"));
    }
}
