//! Billing API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! A `.env` file in the working directory is read first when present.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use pizzeria_core::validation::validate_tax_rate_bps;
use pizzeria_core::{TaxRate, STANDARD_TAX_RATE};

/// Origins always allowed by CORS.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "https://pizza-billing-frontend.onrender.com",
];

/// Connection variables of a server database; SQLite has no use for them.
const IGNORED_DB_VARS: &[&str] = &["DB_HOST", "DB_USER", "DB_PASSWORD", "DB_PORT"];

/// Billing API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listen port
    pub port: u16,

    /// HTTP listen address
    pub bind_addr: String,

    /// SQLite connection URL
    pub database_url: String,

    /// Pool size
    pub db_max_connections: u32,

    /// CORS allow-list: the defaults plus `FRONTEND_URL` entries
    pub allowed_origins: Vec<String>,

    /// Flat tax rate applied to invoices
    pub tax_rate: TaxRate,

    /// Insert the default menu when the catalog is empty
    pub seed_catalog: bool,

    /// Database variables that were set but have no effect
    #[serde(skip)]
    pub ignored_db_vars: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        AppConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = AppConfig {
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),

            database_url: match var("DATABASE_URL") {
                Some(url) => url,
                None => sqlite_url_from_parts(var("DB_DIR"), var("DB_NAME")),
            },

            db_max_connections: var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .ok()
                .filter(|n: &u32| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            allowed_origins: allowed_origins(var("FRONTEND_URL")),

            tax_rate: match var("TAX_RATE_BPS") {
                Some(raw) => {
                    let bps: u32 = raw
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("TAX_RATE_BPS".to_string()))?;
                    validate_tax_rate_bps(bps)
                        .map_err(|_| ConfigError::InvalidValue("TAX_RATE_BPS".to_string()))?;
                    TaxRate::from_bps(bps)
                }
                None => STANDARD_TAX_RATE,
            },

            seed_catalog: match var("SEED_CATALOG") {
                Some(raw) => parse_bool(&raw)
                    .ok_or_else(|| ConfigError::InvalidValue("SEED_CATALOG".to_string()))?,
                None => true,
            },

            ignored_db_vars: IGNORED_DB_VARS
                .iter()
                .filter(|key| var(key).is_some())
                .map(|key| key.to_string())
                .collect(),
        };

        Ok(config)
    }

    /// `host:port` the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn sqlite_url_from_parts(dir: Option<String>, name: Option<String>) -> String {
    let name = name.unwrap_or_else(|| "pizzeria".to_string());
    let file = if name.ends_with(".db") {
        name
    } else {
        format!("{name}.db")
    };

    let path = match dir {
        Some(dir) => PathBuf::from(dir).join(file),
        None => PathBuf::from(file),
    };

    format!("sqlite://{}?mode=rwc", path.display())
}

fn allowed_origins(frontend_url: Option<String>) -> Vec<String> {
    let mut origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS
        .iter()
        .map(|o| o.to_string())
        .collect();

    if let Some(extra) = frontend_url {
        for origin in extra.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            let origin = origin.trim_end_matches('/').to_string();
            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }
    }

    origins
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database_url, "sqlite://pizzeria.db?mode=rwc");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.tax_rate, STANDARD_TAX_RATE);
        assert!(config.seed_catalog);
        assert_eq!(config.allowed_origins.len(), 2);
        assert!(config.ignored_db_vars.is_empty());
    }

    #[test]
    fn test_database_url_wins_over_parts() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DB_NAME", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
    }

    #[test]
    fn test_database_url_from_parts() {
        let config = load(&[
            ("DB_DIR", "/var/lib/pizzeria"),
            ("DB_NAME", "billing"),
            ("DB_HOST", "localhost"),
            ("DB_PASSWORD", "secret"),
        ])
        .unwrap();

        assert_eq!(
            config.database_url,
            "sqlite:///var/lib/pizzeria/billing.db?mode=rwc"
        );
        assert_eq!(config.ignored_db_vars, vec!["DB_HOST", "DB_PASSWORD"]);
    }

    #[test]
    fn test_frontend_urls_are_appended() {
        let config = load(&[(
            "FRONTEND_URL",
            "https://billing.example.com/, http://localhost:3000 ,http://10.0.0.5:3000",
        )])
        .unwrap();

        assert_eq!(
            config.allowed_origins,
            vec![
                "http://localhost:3000",
                "https://pizza-billing-frontend.onrender.com",
                "https://billing.example.com",
                "http://10.0.0.5:3000",
            ]
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue(v)) if v == "PORT"
        ));
        assert!(load(&[("TAX_RATE_BPS", "10001")]).is_err());
        assert!(load(&[("TAX_RATE_BPS", "-5")]).is_err());
        assert!(load(&[("SEED_CATALOG", "maybe")]).is_err());
        assert!(load(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9000"),
            ("TAX_RATE_BPS", "825"),
            ("SEED_CATALOG", "false"),
            ("DB_MAX_CONNECTIONS", "2"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.tax_rate.bps(), 825);
        assert!(!config.seed_catalog);
        assert_eq!(config.db_max_connections, 2);
    }
}
