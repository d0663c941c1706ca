//! Clients (buyers) of the winery

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::ClientId;

use crate::error::PartyError;
use crate::validation::{normalize_identifier, PartyValidator};

/// A client invoices are issued to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Client {
    pub id: ClientId,
    /// Registered business name
    pub name: String,
    /// Tax identification number, 9 digits
    pub pib: String,
    /// Company registration number, 8 digits
    pub mb: String,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Where goods are delivered, when different from the address
    pub delivery_location: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    /// User who created the record
    pub created_by: Option<String>,
}

impl Client {
    /// Creates a client with PIB and MB stored without whitespace
    pub fn new(name: impl Into<String>, pib: &str, mb: &str) -> Self {
        Self {
            id: ClientId::new_v7(),
            name: name.into(),
            pib: normalize_identifier(pib),
            mb: normalize_identifier(mb),
            address: None,
            city: None,
            delivery_location: None,
            email: None,
            phone: None,
            created_at: Utc::now(),
            created_by: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>, city: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self.city = Some(city.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_delivery_location(mut self, location: impl Into<String>) -> Self {
        self.delivery_location = Some(location.into());
        self
    }

    /// Address and city on one line, skipping missing parts
    pub fn full_address(&self) -> Option<String> {
        let parts: Vec<&str> = [self.address.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Validates the client
    ///
    /// # Errors
    ///
    /// Returns `PartyError::ValidationFailed` listing every problem found.
    pub fn ensure_valid(&self) -> Result<(), PartyError> {
        PartyValidator::validate_client(self).into_result()
    }
}
