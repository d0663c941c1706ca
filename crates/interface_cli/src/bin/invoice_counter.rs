//! Invoice counter admin tool
//!
//! # Usage
//!
//! ```bash
//! # Last number issued this year
//! invoice-counter peek
//!
//! # Allocate a number for 2024 by hand
//! invoice-counter next 2024
//!
//! # Continue an existing paper sequence that ended at 130
//! invoice-counter seed 2024 130
//!
//! # Catch the counter up with invoices already in the database
//! invoice-counter resync 2024
//! ```
//!
//! # Environment Variables
//!
//! * `FAKTURE_CONFIG` - configuration file name (default: fakture)
//! * `FAKTURE_DATABASE__URL` or `DATABASE_URL` - PostgreSQL connection string
//! * `FAKTURE_LOG_LEVEL` - log filter (default: info)
//! * `FAKTURE_LOG_JSON` - `true` for JSON log lines

use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use infra_db::{create_pool, PostgresInvoiceNumberAllocator};
use interface_cli::{config::AppConfig, telemetry::init_tracing, Cli, CliError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            let code = e.downcast_ref::<CliError>().map(CliError::exit_code).unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = AppConfig::load_from(&cli.config).context("loading configuration")?;
    init_tracing(&config.log_level, config.log_json)?;

    tracing::debug!(max_connections = config.database.max_connections, "Connecting to database");
    let pool = create_pool(config.database_config())
        .await
        .map_err(CliError::from)
        .context("connecting to the database")?;

    let allocator = PostgresInvoiceNumberAllocator::new(pool.clone());
    let today = Local::now().date_naive();
    let output = cli.command.execute(&allocator, today).await;
    pool.close().await;

    Ok(output?)
}
