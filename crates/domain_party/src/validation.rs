//! Client and company validation rules
//!
//! # Rules
//!
//! - Name is required
//! - PIB (tax identification number) is exactly 9 digits
//! - MB (company registration number) is exactly 8 digits
//! - E-mail, when present, must be a valid address
//!
//! Whitespace inside PIB and MB is ignored, so `"100 200 300"` is a valid PIB.

use validator::{Validate, ValidationErrors};

use crate::client::Client;
use crate::company::CompanySettings;
use crate::error::PartyError;

/// Number of digits in a PIB
pub const PIB_LENGTH: usize = 9;

/// Number of digits in an MB
pub const MB_LENGTH: usize = 8;

/// Result of client or company validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the entity is valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Converts into a `PartyError` when invalid
    pub fn into_result(self) -> Result<(), PartyError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(PartyError::validation_failed(self.errors))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Removes all whitespace from an identifier as typed by the user
pub fn normalize_identifier(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn has_digits(value: &str, length: usize) -> bool {
    let normalized = normalize_identifier(value);
    normalized.len() == length && normalized.chars().all(|c| c.is_ascii_digit())
}

/// Returns true if `pib` is 9 digits after removing whitespace
pub fn is_valid_pib(pib: &str) -> bool {
    has_digits(pib, PIB_LENGTH)
}

/// Returns true if `mb` is 8 digits after removing whitespace
pub fn is_valid_mb(mb: &str) -> bool {
    has_digits(mb, MB_LENGTH)
}

/// Checks a PIB
///
/// # Errors
///
/// Returns `PartyError::InvalidPib` for anything other than 9 digits.
pub fn validate_pib(pib: &str) -> Result<String, PartyError> {
    if is_valid_pib(pib) {
        Ok(normalize_identifier(pib))
    } else {
        Err(PartyError::InvalidPib(pib.to_string()))
    }
}

/// Checks an MB
///
/// # Errors
///
/// Returns `PartyError::InvalidMb` for anything other than 8 digits.
pub fn validate_mb(mb: &str) -> Result<String, PartyError> {
    if is_valid_mb(mb) {
        Ok(normalize_identifier(mb))
    } else {
        Err(PartyError::InvalidMb(mb.to_string()))
    }
}

/// Validator for clients and company settings
pub struct PartyValidator;

impl PartyValidator {
    /// Validates a client
    pub fn validate_client(client: &Client) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if client.name.trim().is_empty() {
            result.add_error("Client name is required");
        }
        Self::validate_identifiers(&client.pib, &client.mb, &mut result);
        if let Err(errors) = client.validate() {
            Self::collect_field_errors(&errors, &mut result);
        }

        result
    }

    /// Validates the issuing company's settings
    pub fn validate_company(settings: &CompanySettings) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if settings.company_name.trim().is_empty() {
            result.add_error("Company name is required");
        }
        if settings.owner_name.trim().is_empty() {
            result.add_error("Owner name is required");
        }
        Self::validate_identifiers(&settings.pib, &settings.mb, &mut result);
        if let Err(errors) = settings.validate() {
            Self::collect_field_errors(&errors, &mut result);
        }

        result
    }

    fn validate_identifiers(pib: &str, mb: &str, result: &mut ValidationResult) {
        if let Err(e) = validate_pib(pib) {
            result.add_error(e.to_string());
        }
        if let Err(e) = validate_mb(mb) {
            result.add_error(e.to_string());
        }
    }

    fn collect_field_errors(errors: &ValidationErrors, result: &mut ValidationResult) {
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                result.add_error(format!("Invalid {}: {}", field, error.code));
            }
        }
    }
}
