//! Production calculation tests
//!
//! Property-based and unit tests for the recipe requirement calculator:
//! - Requirements scale linearly with batch count
//! - Capacity is bounded by the scarcest ingredient
//! - Waste gross-up and net-output rounding

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::costing;
use shared::models::{Ingredient, IngredientType, MaxProduction, RecipeIngredient};
use shared::types::Unit;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn stocked(id: Uuid, name: &str, quantity: Decimal) -> Ingredient {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    Ingredient {
        id,
        bakery_id: Uuid::new_v4(),
        name: name.to_string(),
        ingredient_type: IngredientType::Base,
        unit: Unit::G,
        initial_quantity: quantity,
        history: vec![],
        created_at: now,
        updated_at: now,
    }
}

fn line(id: Uuid, name: &str, quantity: Decimal) -> RecipeIngredient {
    RecipeIngredient {
        ingredient_id: id,
        ingredient_name: name.to_string(),
        quantity,
        unit: Unit::G,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_croissant_planning_scenario() {
        let flour = Uuid::new_v4();
        let butter = Uuid::new_v4();
        let catalog = vec![
            stocked(flour, "Flour", dec("950")),
            stocked(butter, "Butter", dec("200")),
        ];
        let lines = vec![
            line(flour, "Flour", dec("100")),
            line(butter, "Butter", dec("50")),
        ];

        // Requirements for 3 batches: flour fine, butter is the constraint
        let reqs = costing::calculate_requirements(&lines, &catalog, dec("3")).unwrap();
        assert!(reqs[0].sufficient);
        assert!(!reqs[1].sufficient);
        assert_eq!(reqs[1].shortage, dec("50"));
        assert!(!costing::all_sufficient(Some(reqs.as_slice())));

        // Butter caps capacity at 4 batches of 12 croissants
        let max = costing::max_possible_production(&lines, &catalog, dec("12"));
        assert_eq!(max.recipe_count, 4);
        assert_eq!(max.product_quantity, dec("48"));

        // At 5% waste, 4 batches net 45.60 croissants
        let per_batch = costing::final_quantity(dec("12"), dec("5"));
        assert_eq!(Decimal::from(max.recipe_count) * per_batch, dec("45.60"));
    }

    #[test]
    fn test_batch_count_with_waste_gross_up() {
        // 90 good units at 10% waste needs 9.9 batches of 10
        assert_eq!(
            costing::required_batch_count(dec("90"), dec("10"), dec("10")),
            dec("9.9")
        );
        // No waste: plain division
        assert_eq!(
            costing::required_batch_count(dec("90"), dec("10"), Decimal::ZERO),
            dec("9")
        );
    }

    #[test]
    fn test_empty_recipe_yields_null_not_empty() {
        let catalog = vec![stocked(Uuid::new_v4(), "Flour", dec("100"))];
        assert!(costing::calculate_requirements(&[], &catalog, dec("1")).is_none());
        assert!(!costing::all_sufficient(None));
    }

    #[test]
    fn test_deleted_ingredient_blocks_capacity_but_not_listing() {
        let flour = Uuid::new_v4();
        let catalog = vec![stocked(flour, "Flour", dec("1000"))];
        let lines = vec![
            line(flour, "Flour", dec("100")),
            line(Uuid::new_v4(), "Deleted", dec("10")),
        ];

        // The listing skips the dangling line
        let reqs = costing::calculate_requirements(&lines, &catalog, dec("1")).unwrap();
        assert_eq!(reqs.len(), 1);

        // Capacity refuses to overstate: unknown consumption means zero
        assert_eq!(
            costing::max_possible_production(&lines, &catalog, dec("12")),
            MaxProduction::ZERO
        );
    }

    #[test]
    fn test_final_quantity_rounding_half_up() {
        assert_eq!(costing::final_quantity(dec("10"), dec("1.25")), dec("9.88"));
        assert_eq!(costing::final_quantity(dec("48"), dec("5")), dec("45.60"));
        assert_eq!(costing::final_quantity(dec("100"), Decimal::ZERO), dec("100"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn stock_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(Decimal::from)
}

fn per_batch_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000i64).prop_map(Decimal::from)
}

proptest! {
    /// Required quantity scales linearly with batch count.
    #[test]
    fn prop_requirements_scale_with_batches(
        stock_qty in stock_strategy(),
        per_batch in per_batch_strategy(),
        batches in 1i64..1_000i64,
    ) {
        let id = Uuid::new_v4();
        let catalog = vec![stocked(id, "Flour", stock_qty)];
        let lines = vec![line(id, "Flour", per_batch)];

        let batch_count = Decimal::from(batches);
        let reqs = costing::calculate_requirements(&lines, &catalog, batch_count).unwrap();

        prop_assert_eq!(reqs[0].required, per_batch * batch_count);
        prop_assert_eq!(reqs[0].sufficient, stock_qty >= per_batch * batch_count);
    }

    /// The capacity answer is self-consistent: the reported batch count is
    /// feasible, and one more batch is not.
    #[test]
    fn prop_max_production_is_tight(
        stock_qty in stock_strategy(),
        per_batch in per_batch_strategy(),
    ) {
        let id = Uuid::new_v4();
        let catalog = vec![stocked(id, "Flour", stock_qty)];
        let lines = vec![line(id, "Flour", per_batch)];

        let max = costing::max_possible_production(&lines, &catalog, dec("1"));
        let count = Decimal::from(max.recipe_count);

        // Feasible at the reported count
        prop_assert!(per_batch * count <= stock_qty);
        // Not feasible at one more
        prop_assert!(per_batch * (count + Decimal::ONE) > stock_qty);
    }

    /// Adding an ingredient line never increases capacity.
    #[test]
    fn prop_extra_line_never_increases_capacity(
        stock_a in stock_strategy(),
        per_batch_a in per_batch_strategy(),
        stock_b in stock_strategy(),
        per_batch_b in per_batch_strategy(),
    ) {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let catalog = vec![stocked(a, "A", stock_a), stocked(b, "B", stock_b)];

        let one = costing::max_possible_production(
            &[line(a, "A", per_batch_a)],
            &catalog,
            dec("1"),
        );
        let both = costing::max_possible_production(
            &[line(a, "A", per_batch_a), line(b, "B", per_batch_b)],
            &catalog,
            dec("1"),
        );

        prop_assert!(both.recipe_count <= one.recipe_count);
    }

    /// Gross-up round trip: producing the computed batch count and applying
    /// the waste rate nets at least the target.
    #[test]
    fn prop_batch_count_covers_target_after_waste(
        target in 1i64..100_000i64,
        output in 1i64..10_000i64,
        waste_pct in 0i64..100i64,
    ) {
        let target = Decimal::from(target);
        let output = Decimal::from(output);
        let waste = Decimal::from(waste_pct);

        let batches = costing::required_batch_count(target, output, waste);
        let gross = batches * output;
        // Gross-up uses target * (1 + w), so gross output covers the target
        // with the waste amount on top
        prop_assert!(gross >= target);
    }

    /// Net output never exceeds gross output and is never negative for
    /// waste rates within range.
    #[test]
    fn prop_final_quantity_bounded(
        output in 1i64..100_000i64,
        waste_pct in 0i64..=100i64,
    ) {
        let output = Decimal::from(output);
        let net = costing::final_quantity(output, Decimal::from(waste_pct));

        prop_assert!(net >= Decimal::ZERO);
        prop_assert!(net <= output);
    }
}
