//! Core Kernel - Foundational types and utilities for the invoicing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic and sr-RS amount formatting
//! - Percentage rates for discounts and VAT
//! - Strongly-typed identifiers for clients, products and invoices
//! - Port infrastructure shared by the domain adapters

pub mod money;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate, format_amount, round_for_display};
pub use identifiers::{ClientId, ProductId, InvoiceId, InvoiceItemId, CompanyId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    OperationMetadata,
};
