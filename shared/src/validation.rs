//! Validation utilities for the Bakehouse Admin Platform

use rust_decimal::Decimal;

use crate::models::{RecipeIngredient, RecipeType};

// ============================================================================
// Inventory / Recipe Validations
// ============================================================================

/// Validate a waste rate is a percentage in 0-100
pub fn validate_waste_rate(waste_rate: Decimal) -> Result<(), &'static str> {
    if waste_rate < Decimal::ZERO || waste_rate > Decimal::ONE_HUNDRED {
        return Err("Waste rate must be between 0 and 100");
    }
    Ok(())
}

/// Validate a recipe's output per batch is positive
pub fn validate_output_quantity(output_quantity: Decimal) -> Result<(), &'static str> {
    if output_quantity <= Decimal::ZERO {
        return Err("Output quantity must be positive");
    }
    Ok(())
}

/// Validate a recipe has at least one ingredient line with a positive quantity
pub fn validate_recipe_ingredients(lines: &[RecipeIngredient]) -> Result<(), &'static str> {
    if lines.is_empty() {
        return Err("Recipe must have at least one ingredient");
    }
    if lines.iter().any(|l| l.quantity < Decimal::ZERO) {
        return Err("Ingredient quantities cannot be negative");
    }
    Ok(())
}

/// A base-recipe link is only meaningful on a full recipe
pub fn validate_base_recipe_link(
    recipe_type: RecipeType,
    has_base_recipe: bool,
) -> Result<(), &'static str> {
    if has_base_recipe && recipe_type != RecipeType::Full {
        return Err("Only a full recipe may reference a base recipe");
    }
    Ok(())
}

/// An import delta must move stock; zero-quantity entries are noise
pub fn validate_import_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity == Decimal::ZERO {
        return Err("Import quantity cannot be zero");
    }
    Ok(())
}

/// Import prices, when given, cannot be negative
pub fn validate_import_price(price: Option<Decimal>) -> Result<(), &'static str> {
    match price {
        Some(p) if p < Decimal::ZERO => Err("Price cannot be negative"),
        _ => Ok(()),
    }
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a non-empty display name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    if name.len() > 200 {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}
