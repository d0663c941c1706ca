//! `invoice-counter` command line

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use domain_invoicing::{InvoiceNumber, InvoiceNumberAllocatorExt};
use infra_db::PostgresInvoiceNumberAllocator;
use tracing::{info, instrument};

use crate::config::CONFIG_FILE;
use crate::error::CliError;

/// Inspect and advance the per-year invoice counters
#[derive(Debug, Parser)]
#[command(name = "invoice-counter", version)]
pub struct Cli {
    /// Configuration file name, without the .toml extension
    #[arg(long, env = "FAKTURE_CONFIG", default_value = CONFIG_FILE)]
    pub config: String,

    #[command(subcommand)]
    pub command: CounterCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CounterCommand {
    /// Print the last number issued for YEAR without consuming one
    Peek { year: Option<i32> },
    /// Allocate the next number for YEAR and print it
    Next { year: Option<i32> },
    /// Raise the counter for YEAR to at least LAST; never lowers it
    Seed { year: i32, last: u32 },
    /// Raise the counter for YEAR to the highest stored invoice number
    Resync { year: Option<i32> },
}

impl CounterCommand {
    /// The fiscal year the command applies to, defaulting to `today`'s year
    pub fn year(&self, today: NaiveDate) -> i32 {
        match self {
            CounterCommand::Peek { year }
            | CounterCommand::Next { year }
            | CounterCommand::Resync { year } => {
                year.unwrap_or_else(|| today.year())
            }
            CounterCommand::Seed { year, .. } => *year,
        }
    }

    /// Runs the command and returns the line to print
    #[instrument(skip(allocator))]
    pub async fn execute(
        &self,
        allocator: &PostgresInvoiceNumberAllocator,
        today: NaiveDate,
    ) -> Result<String, CliError> {
        let year = self.year(today);
        match self {
            CounterCommand::Peek { .. } => {
                let current = allocator.current_counter(year).await?;
                Ok(describe_counter(year, current))
            }
            CounterCommand::Next { .. } => {
                let number = allocator.allocate(year).await?;
                info!(%number, "Allocated invoice number from the command line");
                Ok(number.to_string())
            }
            CounterCommand::Seed { last, .. } => {
                let current = allocator.seed_counter(year, *last).await?;
                if current > *last {
                    info!(requested = last, current, "Counter already past the requested value");
                }
                Ok(describe_counter(year, current))
            }
            CounterCommand::Resync { .. } => {
                let current = allocator.resync_counter(year).await?;
                Ok(describe_counter(year, current))
            }
        }
    }
}

/// One-line summary of a counter, e.g. `2024: last 5, next 6/2024`
pub fn describe_counter(year: i32, last_number: u32) -> String {
    let next = last_number
        .checked_add(1)
        .and_then(|n| InvoiceNumber::new(n, year).ok())
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());

    if last_number == 0 {
        format!("{}: no invoices yet, next {}", year, next)
    } else {
        format!("{}: last {}, next {}", year, last_number, next)
    }
}
