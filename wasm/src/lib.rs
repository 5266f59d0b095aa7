//! WebAssembly module for the Bakehouse Admin Platform
//!
//! Provides client-side computation for:
//! - Stock level derivation from ingredient history
//! - Low-stock / out-of-stock checks
//! - Production batch and capacity calculations
//! - Offline input validation

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::costing::*;
pub use shared::models::*;
pub use shared::stock::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn dec_from(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

/// Derive the current stock quantity from an ingredient JSON document
#[wasm_bindgen]
pub fn derive_current_quantity(ingredient_json: &str) -> Result<f64, JsValue> {
    let ingredient: Ingredient = serde_json::from_str(ingredient_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid ingredient JSON: {}", e)))?;

    let current = shared::stock::current_quantity(&ingredient);
    Ok(current.to_string().parse().unwrap_or(0.0))
}

/// Whether a stock level falls in the low-stock band for the given threshold
#[wasm_bindgen]
pub fn check_low_stock(current_quantity: f64, threshold: f64) -> bool {
    current_quantity > 0.0 && current_quantity < threshold
}

/// Whether a stock level counts as out of stock
#[wasm_bindgen]
pub fn check_out_of_stock(current_quantity: f64) -> bool {
    current_quantity <= 0.0
}

/// Batches needed to net a target quantity after waste
#[wasm_bindgen]
pub fn calculate_required_batches(
    target_quantity: f64,
    output_per_batch: f64,
    waste_rate: f64,
) -> f64 {
    let batches = shared::costing::required_batch_count(
        dec_from(target_quantity),
        dec_from(output_per_batch),
        dec_from(waste_rate),
    );
    batches.to_string().parse().unwrap_or(0.0)
}

/// Expected good output of one batch after waste, rounded to 2 decimals
#[wasm_bindgen]
pub fn calculate_final_quantity(output_quantity: f64, waste_rate: f64) -> f64 {
    let final_qty = shared::costing::final_quantity(dec_from(output_quantity), dec_from(waste_rate));
    final_qty.to_string().parse().unwrap_or(0.0)
}

/// Maximum producible batches for a recipe against an ingredient catalog.
///
/// Takes the recipe's ingredient lines and the full ingredient catalog as
/// JSON, returns `{recipe_count, product_quantity}` as JSON.
#[wasm_bindgen]
pub fn calculate_max_production(
    recipe_ingredients_json: &str,
    catalog_json: &str,
    output_quantity: f64,
) -> Result<String, JsValue> {
    let lines: Vec<RecipeIngredient> = serde_json::from_str(recipe_ingredients_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid recipe ingredients JSON: {}", e)))?;
    let catalog: Vec<Ingredient> = serde_json::from_str(catalog_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid catalog JSON: {}", e)))?;

    let max =
        shared::costing::max_possible_production(&lines, &catalog, dec_from(output_quantity));

    serde_json::to_string(&max)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Validate a waste rate percentage for form input
#[wasm_bindgen]
pub fn check_waste_rate(waste_rate: f64) -> bool {
    validate_waste_rate(dec_from(waste_rate)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_low_stock() {
        assert!(check_low_stock(50.0, 100.0));
        assert!(!check_low_stock(100.0, 100.0));
        assert!(!check_low_stock(0.0, 100.0));
    }

    #[test]
    fn test_check_out_of_stock() {
        assert!(check_out_of_stock(0.0));
        assert!(check_out_of_stock(-5.0));
        assert!(!check_out_of_stock(1.0));
    }

    #[test]
    fn test_required_batches() {
        // 950 target, 200 per batch, 5% waste -> 4.9875 batches
        let batches = calculate_required_batches(950.0, 200.0, 5.0);
        assert!((batches - 4.9875).abs() < 0.0001);
    }

    #[test]
    fn test_final_quantity() {
        let final_qty = calculate_final_quantity(48.0, 5.0);
        assert!((final_qty - 45.6).abs() < 0.0001);
    }

    #[test]
    fn test_waste_rate_bounds() {
        assert!(check_waste_rate(0.0));
        assert!(check_waste_rate(100.0));
        assert!(!check_waste_rate(-1.0));
        assert!(!check_waste_rate(101.0));
    }
}
