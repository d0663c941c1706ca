//! Settings of the issuing company, printed in every invoice header

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::CompanyId;

use crate::error::PartyError;
use crate::validation::{normalize_identifier, PartyValidator};

/// The winery's own registration and banking data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CompanySettings {
    pub id: CompanyId,
    /// Registered owner (entrepreneur) name
    pub owner_name: String,
    pub company_name: String,
    pub address: Option<String>,
    /// Tax identification number, 9 digits
    pub pib: String,
    /// Company registration number, 8 digits
    pub mb: String,
    /// Current account ("tekuci racun")
    pub bank_account: Option<String>,
    pub bank_name: Option<String>,
    /// Registered activity code ("sifra delatnosti")
    pub activity_code: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl CompanySettings {
    pub fn new(owner_name: impl Into<String>, company_name: impl Into<String>, pib: &str, mb: &str) -> Self {
        Self {
            id: CompanyId::new_v7(),
            owner_name: owner_name.into(),
            company_name: company_name.into(),
            address: None,
            pib: normalize_identifier(pib),
            mb: normalize_identifier(mb),
            bank_account: None,
            bank_name: None,
            activity_code: None,
            phone: None,
            email: None,
        }
    }

    pub fn with_bank(mut self, account: impl Into<String>, bank_name: impl Into<String>) -> Self {
        self.bank_account = Some(account.into());
        self.bank_name = Some(bank_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Bank line as printed under the header, e.g. `160-123456-78 (Banca Intesa)`
    pub fn bank_line(&self) -> Option<String> {
        match (&self.bank_account, &self.bank_name) {
            (Some(account), Some(bank)) => Some(format!("{} ({})", account, bank)),
            (Some(account), None) => Some(account.clone()),
            _ => None,
        }
    }

    /// Validates the settings
    ///
    /// # Errors
    ///
    /// Returns `PartyError::ValidationFailed` listing every problem found.
    pub fn ensure_valid(&self) -> Result<(), PartyError> {
        PartyValidator::validate_company(self).into_result()
    }
}
