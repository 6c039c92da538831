//! Portion calculator tests
//!
//! Covers the portion floor law: for a recipe with ingredients {(p_i, r_i)},
//! calculable portions = min_i floor(stock(p_i) / r_i).

use proptest::prelude::*;
use rust_decimal::Decimal;

use kitchen_stock_backend::services::portions::portions_from_stock;

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The worked example from the design notes: stock {Rice: 2000g, Oil:
    /// 300g}, recipe requires {Rice: 150g, Oil: 50g} per portion
    #[test]
    fn test_portion_floor_law_example() {
        let pairs = [(dec(2000), dec(150)), (dec(300), dec(50))];
        assert_eq!(portions_from_stock(&pairs), 6);
    }

    #[test]
    fn test_single_ingredient_floor() {
        assert_eq!(portions_from_stock(&[(dec(1000), dec(100))]), 10);
        assert_eq!(portions_from_stock(&[(dec(999), dec(100))]), 9);
        assert_eq!(portions_from_stock(&[(dec(99), dec(100))]), 0);
    }

    #[test]
    fn test_empty_recipe_is_never_preparable() {
        assert_eq!(portions_from_stock(&[]), 0);
    }

    #[test]
    fn test_any_empty_ingredient_zeroes_the_recipe() {
        let pairs = [(dec(5000), dec(10)), (dec(0), dec(5))];
        assert_eq!(portions_from_stock(&pairs), 0);
    }

    #[test]
    fn test_defensive_zero_on_bad_requirement() {
        assert_eq!(portions_from_stock(&[(dec(5000), dec(0))]), 0);
        assert_eq!(portions_from_stock(&[(dec(5000), dec(-10))]), 0);
    }

    #[test]
    fn test_fractional_stock_floors_down() {
        // 250.5g of stock, 50g per portion -> 5 portions
        let pairs = [(Decimal::new(2505, 1), dec(50))];
        assert_eq!(portions_from_stock(&pairs), 5);
    }

    #[test]
    fn test_exact_division_has_no_off_by_one() {
        let pairs = [(dec(600), dec(150))];
        assert_eq!(portions_from_stock(&pairs), 4);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// The result never exceeds any single ingredient's own floor quotient
    #[test]
    fn portions_bounded_by_every_ingredient(
        stocks in prop::collection::vec(1i64..=1_000_000, 1..8),
        requirements in prop::collection::vec(1i64..=10_000, 1..8),
    ) {
        let pairs: Vec<(Decimal, Decimal)> = stocks
            .iter()
            .zip(requirements.iter())
            .map(|(s, r)| (dec(*s), dec(*r)))
            .collect();

        let portions = portions_from_stock(&pairs);

        for (stock, required) in &pairs {
            prop_assert!(Decimal::from(portions) * required <= *stock);
        }
    }

    /// The result is maximal: one more portion would overdraw some ingredient
    #[test]
    fn portions_are_maximal(
        stocks in prop::collection::vec(1i64..=1_000_000, 1..8),
        requirements in prop::collection::vec(1i64..=10_000, 1..8),
    ) {
        let pairs: Vec<(Decimal, Decimal)> = stocks
            .iter()
            .zip(requirements.iter())
            .map(|(s, r)| (dec(*s), dec(*r)))
            .collect();

        let portions = portions_from_stock(&pairs);

        let one_more_fits = pairs
            .iter()
            .all(|(stock, required)| Decimal::from(portions + 1) * required <= *stock);
        prop_assert!(!one_more_fits);
    }

    /// Adding stock never lowers the portion count
    #[test]
    fn more_stock_never_fewer_portions(
        stock in 1i64..=100_000,
        required in 1i64..=1_000,
        extra in 0i64..=100_000,
    ) {
        let before = portions_from_stock(&[(dec(stock), dec(required))]);
        let after = portions_from_stock(&[(dec(stock + extra), dec(required))]);
        prop_assert!(after >= before);
    }
}
