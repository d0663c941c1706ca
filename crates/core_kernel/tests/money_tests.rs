//! Unit tests for the Money module
//!
//! Tests cover money creation, rounding, rates,
//! sr-RS display formatting, and edge cases.

use core_kernel::{Money, Currency, Rate, format_amount, round_for_display};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50), Currency::RSD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::RSD);
    }

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::RSD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_default_currency_is_dinar() {
        assert_eq!(Currency::default(), Currency::RSD);
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_round_to_currency_half_away_from_zero() {
        assert_eq!(Money::new(dec!(10.005), Currency::RSD).round_to_currency().amount(), dec!(10.01));
        assert_eq!(Money::new(dec!(-10.005), Currency::RSD).round_to_currency().amount(), dec!(-10.01));
        assert_eq!(Money::new(dec!(10.004), Currency::RSD).round_to_currency().amount(), dec!(10.00));
    }

    #[test]
    fn test_round_for_display() {
        assert_eq!(round_for_display(dec!(1296.0000)), dec!(1296.00));
        assert_eq!(round_for_display(dec!(0.125)), dec!(0.13));
        assert_eq!(round_for_display(dec!(0.135)), dec!(0.14));
    }
}

mod rate {
    use super::*;

    #[test]
    fn test_checked_of_reports_overflow() {
        let rate = Rate::from_percentage(dec!(20));
        assert_eq!(rate.checked_of(dec!(6480)), Some(dec!(1296)));
        assert_eq!(Rate::from_percentage(dec!(150)).checked_of(Decimal::MAX), None);
    }

    #[test]
    fn test_rate_of_amount() {
        assert_eq!(Rate::from_percentage(dec!(10)).of(dec!(7200)), dec!(720));
        assert_eq!(Rate::from_percentage(dec!(0)).of(dec!(500)), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_percentages_are_applied_literally() {
        assert_eq!(Rate::from_percentage(dec!(150)).of(dec!(100)), dec!(150));
        assert_eq!(Rate::from_percentage(dec!(-10)).of(dec!(100)), dec!(-10));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_format_amount_examples() {
        assert_eq!(format_amount(dec!(7776)), "7.776,00");
        assert_eq!(format_amount(dec!(6980.00)), "6.980,00");
        assert_eq!(format_amount(dec!(12)), "12,00");
        assert_eq!(format_amount(dec!(123456)), "123.456,00");
    }

    #[test]
    fn test_format_negative_amount() {
        assert_eq!(format_amount(dec!(-720)), "-720,00");
        assert_eq!(format_amount(dec!(-1000.1)), "-1.000,10");
    }

    #[test]
    fn test_money_display_includes_code() {
        assert_eq!(Money::new(dec!(1296), Currency::RSD).to_string(), "1.296,00 RSD");
        assert_eq!(Money::new(dec!(0.5), Currency::EUR).to_string(), "0,50 EUR");
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_money_json_roundtrip() {
        let m = Money::new(dec!(8276.00), Currency::RSD);
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn test_currency_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Currency::RSD).unwrap(), "\"RSD\"");
    }
}
