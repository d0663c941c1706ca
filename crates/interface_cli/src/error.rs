//! CLI error handling

use core_kernel::CoreError;
use domain_invoicing::InvoicingError;
use infra_db::DatabaseError;
use thiserror::Error;

/// Errors raised while configuring or running the admin tools
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    InvalidConfig(#[from] CoreError),

    #[error("Failed to initialise logging: {0}")]
    Telemetry(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Invoicing(#[from] InvoicingError),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::InvalidConfig(_) => 78,
            CliError::Telemetry(_) => 70,
            CliError::Database(_) => 69,
            CliError::Invoicing(_) => 75,
        }
    }
}
