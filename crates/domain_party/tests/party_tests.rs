//! Tests for domain_party

use proptest::prelude::*;

use domain_party::validation::{normalize_identifier, validate_pib};
use domain_party::{is_valid_mb, is_valid_pib, Client, CompanySettings, PartyError, PartyValidator};

// ============================================================================
// Client Tests
// ============================================================================

mod client_tests {
    use super::*;

    fn vinoteka() -> Client {
        Client::new("Vinoteka Nis", "100200300", "12345678")
            .with_address("Obilicev venac 5", "Nis")
            .with_email("nabavka@vinoteka.rs")
            .with_phone("+381 18 123 456")
    }

    #[test]
    fn test_valid_client() {
        let result = PartyValidator::validate_client(&vinoteka());
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_missing_name() {
        let mut client = vinoteka();
        client.name = "   ".to_string();

        let result = PartyValidator::validate_client(&client);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("name is required")));
    }

    #[test]
    fn test_bad_identifiers_are_all_reported() {
        let mut client = vinoteka();
        client.pib = "12345".to_string();
        client.mb = "abcdefgh".to_string();

        let result = PartyValidator::validate_client(&client);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(
            client.ensure_valid(),
            Err(PartyError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_invalid_email() {
        let client = vinoteka().with_email("not-an-address");

        let result = PartyValidator::validate_client(&client);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("email")));
    }

    #[test]
    fn test_serialization() {
        let client = vinoteka();
        let json = serde_json::to_string(&client).unwrap();
        let back: Client = serde_json::from_str(&json).unwrap();
        assert_eq!(back, client);
    }
}

// ============================================================================
// Company Settings Tests
// ============================================================================

mod company_tests {
    use super::*;

    fn winery() -> CompanySettings {
        CompanySettings::new("Petar Petrovic", "Vinarija Petrovic", "101 202 303", "87654321")
            .with_bank("160-123456-78", "Banca Intesa")
    }

    #[test]
    fn test_valid_settings() {
        let settings = winery();
        assert_eq!(settings.pib, "101202303");
        assert!(settings.ensure_valid().is_ok());
    }

    #[test]
    fn test_bank_line() {
        assert_eq!(winery().bank_line().as_deref(), Some("160-123456-78 (Banca Intesa)"));

        let mut settings = winery();
        settings.bank_account = None;
        assert_eq!(settings.bank_line(), None);
    }

    #[test]
    fn test_missing_owner_and_bad_mb() {
        let mut settings = winery();
        settings.owner_name = String::new();
        settings.mb = "1234567".to_string();

        let result = PartyValidator::validate_company(&settings);
        assert_eq!(result.errors.len(), 2);
    }
}

// ============================================================================
// Identifier Properties
// ============================================================================

proptest! {
    #[test]
    fn nine_digit_strings_are_valid_pibs(pib in "[0-9]{9}") {
        prop_assert!(is_valid_pib(&pib));
        prop_assert!(!is_valid_mb(&pib));
    }

    #[test]
    fn eight_digit_strings_are_valid_mbs(mb in "[0-9]{8}") {
        prop_assert!(is_valid_mb(&mb));
        prop_assert!(!is_valid_pib(&mb));
    }

    #[test]
    fn whitespace_is_ignored(pib in "[0-9]{3} [0-9]{3} [0-9]{3}") {
        prop_assert!(is_valid_pib(&pib));
        prop_assert_eq!(validate_pib(&pib).unwrap(), normalize_identifier(&pib));
    }
}
