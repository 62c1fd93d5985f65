use std::env;
use std::time::Duration;

use axum::http::HeaderValue;

const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

/// Minimum length of the session secret, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub database_url: String,
    pub max_pool_size: u32,
    pub acquire_timeout: Duration,
    pub session_secret: String,
    pub session_expiry_hours: i64,
    pub allowed_origins: Vec<HeaderValue>,
    pub require_auth: bool,
    pub shutdown_grace: Duration,
    pub admin: AdminSeed,
    pub password_hashing: HashingCost,
}

/// Credentials of the administrator account created on first start.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy)]
pub struct HashingCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingCost {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment, loading a
    /// `.env` file first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let session_secret = var("SESSION_SECRET").ok_or(ConfigError::Missing("SESSION_SECRET"))?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::SessionSecretTooShort);
        }

        let mut origins: Vec<String> = match var("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ORIGINS.iter().map(|origin| origin.to_string()).collect(),
        };
        for extra in [var("FRONTEND_URL"), var("PRODUCTION_FRONTEND_URL")]
            .into_iter()
            .flatten()
        {
            if !origins.contains(&extra) {
                origins.push(extra);
            }
        }
        let allowed_origins = origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidOrigin(origin))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let defaults = HashingCost::default();

        Ok(Self {
            server_host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or(var("PORT"), "PORT", 4000)?,
            environment: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
            database_url: var("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://purchase_orders.db".to_string()),
            max_pool_size: parse_or(var("MAX_POOL_SIZE"), "MAX_POOL_SIZE", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(
                var("DB_ACQUIRE_TIMEOUT"),
                "DB_ACQUIRE_TIMEOUT",
                5,
            )?),
            session_secret,
            session_expiry_hours: parse_or(
                var("SESSION_EXPIRY_HOURS"),
                "SESSION_EXPIRY_HOURS",
                24,
            )?,
            allowed_origins,
            require_auth: parse_bool(var("REQUIRE_AUTH"), "REQUIRE_AUTH")?,
            shutdown_grace: Duration::from_secs(parse_or(
                var("SHUTDOWN_GRACE_SECS"),
                "SHUTDOWN_GRACE_SECS",
                10,
            )?),
            admin: AdminSeed {
                username: var("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                password: var("ADMIN_PASSWORD").unwrap_or_else(|| "admin123".to_string()),
                email: var("ADMIN_EMAIL").unwrap_or_else(|| "admin@example.com".to_string()),
                full_name: "Administrator".to_string(),
            },
            password_hashing: HashingCost {
                memory_kib: parse_or(var("ARGON2_MEMORY_KIB"), "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse_or(var("ARGON2_ITERATIONS"), "ARGON2_ITERATIONS", defaults.iterations)?,
                parallelism: parse_or(
                    var("ARGON2_PARALLELISM"),
                    "ARGON2_PARALLELISM",
                    defaults.parallelism,
                )?,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_bool(value: Option<String>, key: &'static str) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::trim) {
        None => Ok(false),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid(key)),
        },
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} has an invalid value")]
    Invalid(&'static str),
    #[error("SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes long")]
    SessionSecretTooShort,
    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup(&[("SESSION_SECRET", SECRET)])).unwrap();

        assert_eq!(config.server_port, 4000);
        assert_eq!(config.server_addr(), "0.0.0.0:4000");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.session_expiry_hours, 24);
        assert_eq!(config.allowed_origins.len(), DEFAULT_ORIGINS.len());
        assert!(!config.require_auth);
        assert!(!config.is_production());
        assert_eq!(config.admin.username, "admin");
    }

    #[test]
    fn missing_secret_is_rejected() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SESSION_SECRET")));
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = Config::from_lookup(lookup(&[("SESSION_SECRET", "short")])).unwrap_err();
        assert!(matches!(err, ConfigError::SessionSecretTooShort));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("SESSION_SECRET", SECRET), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("PORT")));
    }

    #[test]
    fn origins_are_split_and_frontend_urls_appended() {
        let config = Config::from_lookup(lookup(&[
            ("SESSION_SECRET", SECRET),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example"),
            ("PRODUCTION_FRONTEND_URL", "https://app.example"),
            ("REQUIRE_AUTH", "true"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();

        let origins: Vec<&str> = config
            .allowed_origins
            .iter()
            .map(|origin| origin.to_str().unwrap())
            .collect();
        assert_eq!(
            origins,
            vec!["https://a.example", "https://b.example", "https://app.example"]
        );
        assert!(config.require_auth);
        assert!(config.is_production());
    }
}
