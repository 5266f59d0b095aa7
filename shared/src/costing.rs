//! Recipe requirement and production-capacity calculations
//!
//! Answers "can I make N batches right now?" and "what is the most I can
//! make?" against stock derived by `crate::stock`. Every function here is
//! stateless; inputs that cannot be computed resolve to `None`/zero sentinels
//! rather than errors so the dashboard can always render something, even
//! over partial or legacy data.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Ingredient, IngredientRequirement, MaxProduction, RecipeIngredient};
use crate::stock;

/// Per-line requirement versus availability for `batch_count` batches.
///
/// Returns `None` when there is nothing to compute (no lines, or a
/// non-positive batch count) — distinct from a computed-but-empty result.
/// Lines referencing an ingredient missing from the catalog are skipped so a
/// dangling reference cannot block the rest of the listing; surviving lines
/// keep their recipe order.
pub fn calculate_requirements(
    recipe_ingredients: &[RecipeIngredient],
    catalog: &[Ingredient],
    batch_count: Decimal,
) -> Option<Vec<IngredientRequirement>> {
    if recipe_ingredients.is_empty() || batch_count <= Decimal::ZERO {
        return None;
    }

    let requirements = recipe_ingredients
        .iter()
        .filter_map(|line| {
            let ingredient = catalog.iter().find(|i| i.id == line.ingredient_id)?;
            let required = line.quantity * batch_count;
            let available = stock::current_quantity(ingredient);
            let shortage = (required - available).max(Decimal::ZERO);
            Some(IngredientRequirement {
                ingredient: ingredient.clone(),
                recipe_ingredient: line.clone(),
                required,
                available,
                sufficient: available >= required,
                shortage,
            })
        })
        .collect();

    Some(requirements)
}

/// True only for a non-empty computed listing in which every line is
/// sufficient. `None` (not computable) and an empty listing both count as
/// insufficient.
pub fn all_sufficient(requirements: Option<&[IngredientRequirement]>) -> bool {
    match requirements {
        Some(reqs) if !reqs.is_empty() => reqs.iter().all(|r| r.sufficient),
        _ => false,
    }
}

/// Batches needed to net `target_quantity` good units after `waste_rate`%
/// shrinkage.
///
/// Fractional by design; whether to round up to whole batches is the
/// caller's policy. Returns zero when `output_quantity` is non-positive.
pub fn required_batch_count(
    target_quantity: Decimal,
    output_quantity: Decimal,
    waste_rate: Decimal,
) -> Decimal {
    if output_quantity <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    target_quantity * (Decimal::ONE + waste_rate / Decimal::ONE_HUNDRED) / output_quantity
}

/// Maximum whole batches supportable by current stock, bounded by the
/// scarcest ingredient.
///
/// Per line: `floor(available / per_batch_quantity)`. A line with a
/// non-positive per-batch quantity does not constrain the minimum, but an
/// ingredient with zero or negative stock caps the line at exactly zero
/// batches. A line whose ingredient is missing from the catalog also caps at
/// zero: a capacity estimate must not overstate by ignoring an unknown
/// ingredient, even though the requirement listing skips the same line.
pub fn max_possible_production(
    recipe_ingredients: &[RecipeIngredient],
    catalog: &[Ingredient],
    output_quantity: Decimal,
) -> MaxProduction {
    if recipe_ingredients.is_empty() || output_quantity <= Decimal::ZERO {
        return MaxProduction::ZERO;
    }

    let mut min_batches: Option<u64> = None;
    for line in recipe_ingredients {
        let bound = match catalog.iter().find(|i| i.id == line.ingredient_id) {
            None => 0,
            Some(ingredient) => {
                let available = stock::current_quantity(ingredient);
                if available <= Decimal::ZERO {
                    0
                } else if line.quantity <= Decimal::ZERO {
                    // Unconstraining: positive stock, nothing consumed per batch
                    continue;
                } else {
                    (available / line.quantity).floor().to_u64().unwrap_or(0)
                }
            }
        };
        if bound == 0 {
            return MaxProduction::ZERO;
        }
        min_batches = Some(min_batches.map_or(bound, |m| m.min(bound)));
    }

    match min_batches {
        None => MaxProduction::ZERO,
        Some(recipe_count) => MaxProduction {
            recipe_count,
            product_quantity: Decimal::from(recipe_count) * output_quantity,
        },
    }
}

/// Expected good output of one batch after `waste_rate`% shrinkage, rounded
/// half-up to two decimals.
///
/// Display/costing figure only; capacity math in `max_possible_production`
/// deliberately stays pre-waste and composing the two is the caller's job.
pub fn final_quantity(output_quantity: Decimal, waste_rate: Decimal) -> Decimal {
    if output_quantity <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (output_quantity * (Decimal::ONE - waste_rate / Decimal::ONE_HUNDRED))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientType, RecipeIngredient};
    use crate::types::Unit;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn catalog_ingredient(id: Uuid, name: &str, initial: &str) -> Ingredient {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        Ingredient {
            id,
            bakery_id: Uuid::new_v4(),
            name: name.to_string(),
            ingredient_type: IngredientType::Base,
            unit: Unit::G,
            initial_quantity: dec(initial),
            history: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn line(id: Uuid, name: &str, quantity: &str) -> RecipeIngredient {
        RecipeIngredient {
            ingredient_id: id,
            ingredient_name: name.to_string(),
            quantity: dec(quantity),
            unit: Unit::G,
        }
    }

    #[test]
    fn test_requirements_not_computable() {
        let flour = Uuid::new_v4();
        let catalog = vec![catalog_ingredient(flour, "Flour", "450")];

        assert!(calculate_requirements(&[], &catalog, dec("5")).is_none());
        assert!(
            calculate_requirements(&[line(flour, "Flour", "200")], &catalog, Decimal::ZERO)
                .is_none()
        );
        assert!(
            calculate_requirements(&[line(flour, "Flour", "200")], &catalog, dec("-1")).is_none()
        );
    }

    #[test]
    fn test_requirements_sufficient_and_short() {
        let flour = Uuid::new_v4();
        let catalog = vec![catalog_ingredient(flour, "Flour", "450")];
        let lines = vec![line(flour, "Flour", "200")];

        let reqs = calculate_requirements(&lines, &catalog, dec("2")).unwrap();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].required, dec("400"));
        assert_eq!(reqs[0].available, dec("450"));
        assert!(reqs[0].sufficient);
        assert_eq!(reqs[0].shortage, Decimal::ZERO);

        let reqs = calculate_requirements(&lines, &catalog, dec("3")).unwrap();
        assert_eq!(reqs[0].required, dec("600"));
        assert!(!reqs[0].sufficient);
        assert_eq!(reqs[0].shortage, dec("150"));
    }

    #[test]
    fn test_requirements_skip_dangling_lines_keep_order() {
        let flour = Uuid::new_v4();
        let sugar = Uuid::new_v4();
        let catalog = vec![
            catalog_ingredient(flour, "Flour", "500"),
            catalog_ingredient(sugar, "Sugar", "500"),
        ];
        let lines = vec![
            line(flour, "Flour", "100"),
            line(Uuid::new_v4(), "Deleted", "100"),
            line(sugar, "Sugar", "50"),
        ];

        let reqs = calculate_requirements(&lines, &catalog, dec("1")).unwrap();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].recipe_ingredient.ingredient_name, "Flour");
        assert_eq!(reqs[1].recipe_ingredient.ingredient_name, "Sugar");
    }

    #[test]
    fn test_all_sufficient_null_and_empty_are_insufficient() {
        assert!(!all_sufficient(None));
        assert!(!all_sufficient(Some(&[])));
    }

    #[test]
    fn test_all_sufficient_on_computed_listing() {
        let flour = Uuid::new_v4();
        let catalog = vec![catalog_ingredient(flour, "Flour", "450")];
        let lines = vec![line(flour, "Flour", "200")];

        let ok = calculate_requirements(&lines, &catalog, dec("2"));
        assert!(all_sufficient(ok.as_deref()));

        let short = calculate_requirements(&lines, &catalog, dec("3"));
        assert!(!all_sufficient(short.as_deref()));
    }

    #[test]
    fn test_required_batch_count() {
        // Division guard
        assert_eq!(
            required_batch_count(dec("100"), Decimal::ZERO, dec("10")),
            Decimal::ZERO
        );
        assert_eq!(required_batch_count(dec("90"), dec("10"), dec("0")), dec("9"));
        assert_eq!(
            required_batch_count(dec("90"), dec("10"), dec("10")),
            dec("9.9")
        );
    }

    #[test]
    fn test_max_production_bounded_by_scarcest() {
        let flour = Uuid::new_v4();
        let sugar = Uuid::new_v4();
        let catalog = vec![
            catalog_ingredient(flour, "Flour", "950"),
            catalog_ingredient(sugar, "Sugar", "200"),
        ];
        let lines = vec![line(flour, "Flour", "100"), line(sugar, "Sugar", "50")];

        let max = max_possible_production(&lines, &catalog, dec("12"));
        assert_eq!(max.recipe_count, 4);
        assert_eq!(max.product_quantity, dec("48"));
    }

    #[test]
    fn test_max_production_exhausted_ingredient_blocks() {
        let flour = Uuid::new_v4();
        let sugar = Uuid::new_v4();
        let catalog = vec![
            catalog_ingredient(flour, "Flour", "100000"),
            catalog_ingredient(sugar, "Sugar", "0"),
        ];
        let lines = vec![line(flour, "Flour", "1"), line(sugar, "Sugar", "0.001")];

        let max = max_possible_production(&lines, &catalog, dec("12"));
        assert_eq!(max, MaxProduction::ZERO);
    }

    #[test]
    fn test_max_production_unknown_ingredient_blocks() {
        let flour = Uuid::new_v4();
        let catalog = vec![catalog_ingredient(flour, "Flour", "1000")];
        let lines = vec![
            line(flour, "Flour", "100"),
            line(Uuid::new_v4(), "Deleted", "1"),
        ];

        let max = max_possible_production(&lines, &catalog, dec("12"));
        assert_eq!(max, MaxProduction::ZERO);
    }

    #[test]
    fn test_max_production_zero_quantity_line_is_unconstraining() {
        let flour = Uuid::new_v4();
        let sprinkle = Uuid::new_v4();
        let catalog = vec![
            catalog_ingredient(flour, "Flour", "300"),
            catalog_ingredient(sprinkle, "Sprinkles", "5"),
        ];
        let lines = vec![line(flour, "Flour", "100"), line(sprinkle, "Sprinkles", "0")];

        let max = max_possible_production(&lines, &catalog, dec("10"));
        assert_eq!(max.recipe_count, 3);
        assert_eq!(max.product_quantity, dec("30"));
    }

    #[test]
    fn test_max_production_only_unconstraining_lines() {
        let sprinkle = Uuid::new_v4();
        let catalog = vec![catalog_ingredient(sprinkle, "Sprinkles", "5")];
        let lines = vec![line(sprinkle, "Sprinkles", "0")];

        assert_eq!(
            max_possible_production(&lines, &catalog, dec("10")),
            MaxProduction::ZERO
        );
    }

    #[test]
    fn test_max_production_guards() {
        let flour = Uuid::new_v4();
        let catalog = vec![catalog_ingredient(flour, "Flour", "1000")];
        let lines = vec![line(flour, "Flour", "100")];

        assert_eq!(
            max_possible_production(&[], &catalog, dec("10")),
            MaxProduction::ZERO
        );
        assert_eq!(
            max_possible_production(&lines, &catalog, Decimal::ZERO),
            MaxProduction::ZERO
        );
    }

    #[test]
    fn test_final_quantity() {
        assert_eq!(final_quantity(dec("48"), dec("5")), dec("45.60"));
        assert_eq!(final_quantity(Decimal::ZERO, dec("50")), Decimal::ZERO);
        assert_eq!(final_quantity(dec("-3"), dec("0")), Decimal::ZERO);
        // Half-up at the third decimal: 10 * (1 - 1.25/100) = 9.875 -> 9.88
        assert_eq!(final_quantity(dec("10"), dec("1.25")), dec("9.88"));
    }
}
