//! Stock ledger tests
//!
//! Property-based and unit tests for stock derivation:
//! - Current quantity is a pure fold over the history
//! - Low-stock and out-of-stock flags are mutually exclusive
//! - Price aggregates only count priced imports

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{HistoryEntry, HistoryEntryType, Ingredient, IngredientType};
use shared::stock::{self, StockLedger};
use shared::types::Unit;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn ingredient(initial: Decimal, history: Vec<HistoryEntry>) -> Ingredient {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    Ingredient {
        id: Uuid::new_v4(),
        bakery_id: Uuid::new_v4(),
        name: "Flour".to_string(),
        ingredient_type: IngredientType::Base,
        unit: Unit::G,
        initial_quantity: initial,
        history,
        created_at: now,
        updated_at: now,
    }
}

fn import(quantity: Decimal, price: Option<Decimal>, day: u32) -> HistoryEntry {
    HistoryEntry {
        id: Uuid::new_v4(),
        entry_type: HistoryEntryType::Import,
        from_quantity: Decimal::ZERO,
        import_quantity: quantity,
        unit: Unit::G,
        price,
        supplier_id: None,
        supplier_name: None,
        note: None,
        created_at: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_derivation_over_mixed_history() {
        let ing = ingredient(
            dec("100"),
            vec![
                import(dec("200"), Some(dec("15")), 2),
                import(dec("-50"), None, 3),
                import(dec("30"), Some(dec("18")), 5),
            ],
        );

        assert_eq!(stock::current_quantity(&ing), dec("280"));
        assert_eq!(stock::total_imported(&ing), dec("180"));
        assert_eq!(stock::total_import_value(&ing), dec("3540"));
        assert_eq!(stock::average_price(&ing), Some(dec("16.5")));
        assert_eq!(
            stock::last_import_date(&ing),
            Some(Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_threshold_band_edges() {
        let ledger = StockLedger::default();

        // Exactly at the threshold is not low stock
        let at = ingredient(dec("100"), vec![]);
        assert!(!ledger.is_low_stock(&at));
        assert!(!ledger.is_out_of_stock(&at));

        // Just below is low stock
        let below = ingredient(dec("99.99"), vec![]);
        assert!(ledger.is_low_stock(&below));

        // Zero is out of stock, never low stock
        let zero = ingredient(Decimal::ZERO, vec![]);
        assert!(!ledger.is_low_stock(&zero));
        assert!(ledger.is_out_of_stock(&zero));
    }

    #[test]
    fn test_negative_balance_after_correction() {
        let ing = ingredient(dec("10"), vec![import(dec("-25"), None, 2)]);
        assert_eq!(stock::current_quantity(&ing), dec("-15"));
        assert!(ing.initial_quantity >= Decimal::ZERO);

        let ledger = StockLedger::default();
        assert!(ledger.is_out_of_stock(&ing));
        assert!(!ledger.is_low_stock(&ing));
    }

    #[test]
    fn test_unpriced_imports_excluded_from_price_aggregates() {
        let ing = ingredient(dec("0"), vec![import(dec("500"), None, 2)]);
        assert_eq!(stock::average_price(&ing), None);
        assert_eq!(stock::total_import_value(&ing), Decimal::ZERO);
        // The quantity still moved
        assert_eq!(stock::current_quantity(&ing), dec("500"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    // Signed import quantities within a realistic magnitude
    (-100_000i64..100_000i64).prop_map(Decimal::from)
}

fn initial_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000i64).prop_map(Decimal::from)
}

proptest! {
    /// Current quantity always equals initial plus the sum of import deltas.
    #[test]
    fn prop_current_quantity_is_initial_plus_imports(
        initial in initial_strategy(),
        quantities in prop::collection::vec(quantity_strategy(), 0..20),
    ) {
        let history: Vec<HistoryEntry> = quantities
            .iter()
            .map(|q| import(*q, None, 2))
            .collect();
        let ing = ingredient(initial, history);

        let expected: Decimal = initial + quantities.iter().copied().sum::<Decimal>();
        prop_assert_eq!(stock::current_quantity(&ing), expected);
    }

    /// Low-stock and out-of-stock can never both be set.
    #[test]
    fn prop_stock_flags_mutually_exclusive(
        initial in initial_strategy(),
        quantities in prop::collection::vec(quantity_strategy(), 0..20),
    ) {
        let history: Vec<HistoryEntry> = quantities
            .iter()
            .map(|q| import(*q, None, 2))
            .collect();
        let ing = ingredient(initial, history);
        let ledger = StockLedger::default();

        prop_assert!(!(ledger.is_low_stock(&ing) && ledger.is_out_of_stock(&ing)));
    }

    /// Appending an entry never changes the interpretation of earlier ones:
    /// the new balance differs from the old by exactly the new delta.
    #[test]
    fn prop_append_moves_balance_by_delta(
        initial in initial_strategy(),
        quantities in prop::collection::vec(quantity_strategy(), 0..20),
        delta in quantity_strategy(),
    ) {
        let history: Vec<HistoryEntry> = quantities
            .iter()
            .map(|q| import(*q, None, 2))
            .collect();
        let before = stock::current_quantity(&ingredient(initial, history.clone()));

        let mut appended = history;
        appended.push(import(delta, None, 3));
        let after = stock::current_quantity(&ingredient(initial, appended));

        prop_assert_eq!(after - before, delta);
    }

    /// Average price, when present, lies within the range of recorded prices.
    #[test]
    fn prop_average_price_within_bounds(
        prices in prop::collection::vec(1i64..10_000i64, 1..20),
    ) {
        let history: Vec<HistoryEntry> = prices
            .iter()
            .map(|p| import(dec("10"), Some(Decimal::from(*p)), 2))
            .collect();
        let ing = ingredient(Decimal::ZERO, history);

        let avg = stock::average_price(&ing).unwrap();
        let min = Decimal::from(*prices.iter().min().unwrap());
        let max = Decimal::from(*prices.iter().max().unwrap());
        prop_assert!(avg >= min && avg <= max);
    }
}
