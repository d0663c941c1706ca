//! Application configuration
//!
//! Sources, lowest priority first:
//!
//! 1. built-in defaults (`DATABASE_URL` from the environment seeds `database.url`)
//! 2. an optional `fakture.toml`
//! 3. `FAKTURE_*` environment variables, `__` between nested keys,
//!    e.g. `FAKTURE_DATABASE__MAX_CONNECTIONS=10`
//!
//! A `.env` file is read into the environment first when present.

use std::time::Duration;

use core_kernel::CoreError;
use domain_invoicing::InvoiceDefaults;
use infra_db::{DatabaseConfig, DEFAULT_DATABASE_URL};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Default configuration file name, without extension
pub const CONFIG_FILE: &str = "fakture";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "FAKTURE";

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    /// Filter directive, e.g. `info` or `info,sqlx=warn`
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,
    pub invoice_defaults: InvoiceDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            log_level: "info".to_string(),
            log_json: false,
            invoice_defaults: InvoiceDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Loads `.env`, then `fakture.toml` and `FAKTURE_*` variables
    pub fn load() -> Result<Self, CliError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Like [`AppConfig::load`] with a different configuration file
    pub fn load_from(file: &str) -> Result<Self, CliError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("database.url", database_url_from_env())?
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Parses TOML text on top of the defaults, without touching the environment
    pub fn from_toml(text: &str) -> Result<Self, CliError> {
        let app: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Checks values the types alone cannot express
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.database.url.trim();
        if url.is_empty() {
            return Err(CoreError::configuration("database.url is empty"));
        }
        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            return Err(CoreError::configuration(format!(
                "database.url must be a postgres:// URL (got '{}')",
                url
            )));
        }
        if self.database.max_connections == 0 {
            return Err(CoreError::configuration("database.max_connections must be at least 1"));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(CoreError::configuration(format!(
                "database.min_connections ({}) exceeds max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        if EnvFilter::try_new(&self.log_level).is_err() {
            return Err(CoreError::configuration(format!(
                "log_level '{}' is not a valid filter",
                self.log_level
            )));
        }
        let vat = self.invoice_defaults.vat_rate;
        if vat < Decimal::ZERO || vat > Decimal::ONE_HUNDRED {
            return Err(CoreError::configuration(format!(
                "invoice_defaults.vat_rate must be between 0 and 100 (got {})",
                vat
            )));
        }
        Ok(())
    }

    /// Pool settings for `infra_db::create_pool`
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database.url.trim())
            .max_connections(self.database.max_connections)
            .min_connections(self.database.min_connections)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs))
    }
}

fn database_url_from_env() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}
