//! Party domain errors

use thiserror::Error;

/// Errors that can occur in the party domain
#[derive(Debug, Error)]
pub enum PartyError {
    /// Client with the given ID was not found
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// Tax identification number (PIB) is not 9 digits
    #[error("Invalid PIB '{0}': must be exactly 9 digits")]
    InvalidPib(String),

    /// Company registration number (MB) is not 8 digits
    #[error("Invalid MB '{0}': must be exactly 8 digits")]
    InvalidMb(String),

    /// Invalid data provided
    #[error("Invalid party data: {0}")]
    InvalidData(String),

    /// Validation failed
    #[error("Party validation failed: {0}")]
    ValidationFailed(String),
}

impl PartyError {
    /// Creates a ClientNotFound error from any ID type
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        PartyError::ClientNotFound(id.to_string())
    }

    /// Creates an InvalidData error with a message
    pub fn invalid(message: impl Into<String>) -> Self {
        PartyError::InvalidData(message.into())
    }

    /// Creates a ValidationFailed error from validation errors
    pub fn validation_failed(errors: Vec<String>) -> Self {
        PartyError::ValidationFailed(errors.join("; "))
    }
}
