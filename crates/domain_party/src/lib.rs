//! Party Domain - Clients and Company Settings
//!
//! This crate holds the parties that appear on an invoice: the clients
//! being billed and the issuing company itself, together with the Serbian
//! registration rules they must satisfy (PIB and MB).
//!
//! # Examples
//!
//! ```rust
//! use domain_party::Client;
//!
//! let client = Client::new("Vinoteka Nis", "100 200 300", "12345678")
//!     .with_email("nabavka@vinoteka.rs");
//!
//! assert_eq!(client.pib, "100200300");
//! assert!(client.ensure_valid().is_ok());
//! ```

pub mod client;
pub mod company;
pub mod error;
pub mod validation;

pub use client::Client;
pub use company::CompanySettings;
pub use error::PartyError;
pub use validation::{PartyValidator, ValidationResult, is_valid_mb, is_valid_pib};
