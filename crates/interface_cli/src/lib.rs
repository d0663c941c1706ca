//! Command Line Interface Layer
//!
//! Configuration loading, logging setup and the `invoice-counter` admin
//! tool.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_cli::{config::AppConfig, telemetry::init_tracing};
//!
//! let config = AppConfig::load()?;
//! init_tracing(&config.log_level, config.log_json)?;
//! let pool = infra_db::create_pool(config.database_config()).await?;
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod telemetry;

pub use commands::{Cli, CounterCommand};
pub use config::AppConfig;
pub use error::CliError;
