//! Calculation engine tests

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_invoicing::calculation::{
    calculate, calculate_item, checked_calculate, InvoiceCalculation, LineItem,
};
use domain_invoicing::draft::item_errors;
use test_utils::generators::{line_item_strategy, line_items_strategy, unchecked_line_item_strategy};

fn item_a() -> LineItem {
    LineItem::new(dec!(6), dec!(1200.00), dec!(10), dec!(20))
}

fn item_b() -> LineItem {
    LineItem::new(dec!(1), dec!(500.00), dec!(0), dec!(0))
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn test_two_items_aggregate() {
        let result = calculate(&[item_a(), item_b()]);

        let b = &result.item_calculations[1];
        assert_eq!(b.base_amount, dec!(500.00));
        assert_eq!(b.net_amount, dec!(500.00));
        assert_eq!(b.total, dec!(500.00));
        assert_eq!(b.vat_amount, Decimal::ZERO);

        assert_eq!(result.subtotal, dec!(6980.00));
        assert_eq!(result.vat_amount, dec!(1296.00));
        assert_eq!(result.total, dec!(8276.00));
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let result = calculate(&[]);

        assert_eq!(result.subtotal, Decimal::ZERO);
        assert_eq!(result.vat_amount, Decimal::ZERO);
        assert_eq!(result.total, Decimal::ZERO);
        assert!(result.item_calculations.is_empty());
        assert_eq!(result, InvoiceCalculation::default());
    }

    #[test]
    fn test_out_of_range_values_are_computed_literally() {
        let over_discounted = LineItem::new(dec!(2), dec!(100), dec!(150), dec!(20));
        let calc = calculate_item(&over_discounted);

        assert_eq!(calc.discount_amount, dec!(300));
        assert_eq!(calc.net_amount, dec!(-100));
        assert_eq!(calc.vat_amount, dec!(-20));
        assert_eq!(calc.total, dec!(-120));
    }

    #[test]
    fn test_overflowing_figures_are_caught_not_panicked() {
        let too_large = LineItem::new(Decimal::from(10i64.pow(15)), Decimal::from(10i64.pow(15)), dec!(0), dec!(20));
        assert_eq!(too_large.checked_calculate(), None);
        assert_eq!(checked_calculate(&[item_a(), too_large]), None);
        assert!(!item_errors(&too_large).is_empty());

        // each row fits, their sum does not
        let half_max = LineItem::new(dec!(1), Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0), dec!(0), dec!(0));
        assert!(half_max.checked_calculate().is_some());
        assert!(item_errors(&half_max).is_empty());
        assert_eq!(checked_calculate(&[half_max, half_max]), None);
    }

    #[test]
    fn test_fractional_quantities() {
        // half a case of 0.75 l bottles at a reduced VAT rate
        let item = LineItem::new(dec!(0.5), dec!(999.99), dec!(5), dec!(10));
        let calc = calculate_item(&item);

        assert_eq!(calc.base_amount, dec!(499.995));
        assert_eq!(calc.net_amount, calc.base_amount - calc.discount_amount);
        assert_eq!(calc.total, calc.net_amount + calc.vat_amount);
    }

    #[test]
    fn test_display_rounding_is_half_away_from_zero() {
        let item = LineItem::new(dec!(1), dec!(0.125), dec!(0), dec!(0));
        let result = calculate(&[item]);

        assert_eq!(result.display_totals().total, dec!(0.13));
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn calculation_is_deterministic(items in line_items_strategy(8)) {
        prop_assert_eq!(calculate(&items), calculate(&items));
    }

    #[test]
    fn checked_path_agrees_in_range(items in line_items_strategy(8)) {
        prop_assert_eq!(checked_calculate(&items), Some(calculate(&items)));
    }

    #[test]
    fn per_item_figures_are_exact(item in unchecked_line_item_strategy()) {
        let calc = calculate_item(&item);
        prop_assert_eq!(calc.base_amount, item.quantity * item.unit_price);
        prop_assert_eq!(calc.net_amount, calc.base_amount - calc.discount_amount);
        prop_assert_eq!(calc.total, calc.net_amount + calc.vat_amount);
    }

    #[test]
    fn aggregates_are_consistent(items in line_items_strategy(12)) {
        let result = calculate(&items);
        prop_assert_eq!(result.subtotal + result.vat_amount, result.total);

        let display = result.display_totals();
        prop_assert!((display.subtotal + display.vat_amount - display.total).abs() <= dec!(0.01));
    }

    #[test]
    fn order_is_preserved(items in line_items_strategy(12)) {
        let result = calculate(&items);
        prop_assert_eq!(result.item_calculations.len(), items.len());
        for (item, calc) in items.iter().zip(&result.item_calculations) {
            prop_assert_eq!(*calc, calculate_item(item));
        }
    }

    #[test]
    fn valid_items_never_go_negative(item in line_item_strategy()) {
        let calc = calculate_item(&item);
        prop_assert!(calc.net_amount >= Decimal::ZERO);
        prop_assert!(calc.total >= calc.net_amount);
    }
}
