//! Recipe models
//!
//! A recipe is a named ratio of ingredient quantities that yields one batch
//! of `output_quantity` raw units before waste. Requirement and capacity
//! calculations over these models live in `crate::costing`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Ingredient;
use crate::types::Unit;

/// Recipe tiers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecipeType {
    /// A standalone sub-recipe (sponge, dough, cream)
    #[default]
    Base,
    /// A finished product; may reference a base recipe for navigation
    Full,
}

impl RecipeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeType::Base => "base",
            RecipeType::Full => "full",
        }
    }
}

/// One ingredient line of a recipe; `quantity` is per single batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_id: Uuid,
    /// Snapshot of the ingredient name at the time the recipe was saved
    pub ingredient_name: String,
    pub quantity: Decimal,
    pub unit: Unit,
}

/// A recipe definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub bakery_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Ordered ingredient lines; a full recipe's list is its own flat list,
    /// never base-plus-delta
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    /// Units produced per batch, before waste
    pub output_quantity: Decimal,
    /// Shrinkage percentage (0-100) applied after production
    #[serde(default)]
    pub waste_rate: Decimal,
    #[serde(default)]
    pub recipe_type: RecipeType,
    /// Navigational link from a full recipe to its base recipe. This does
    /// NOT expand ingredient requirements recursively; existing data depends
    /// on the flat interpretation.
    pub base_recipe_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Requirement versus availability for one recipe-ingredient pair at a given
/// batch count
#[derive(Debug, Clone, Serialize)]
pub struct IngredientRequirement {
    pub ingredient: Ingredient,
    pub recipe_ingredient: RecipeIngredient,
    pub required: Decimal,
    pub available: Decimal,
    pub sufficient: bool,
    pub shortage: Decimal,
}

/// Maximum producible quantity bounded by the scarcest ingredient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaxProduction {
    /// Whole batches supportable by current stock
    pub recipe_count: u64,
    /// `recipe_count * output_quantity`, pre-waste
    pub product_quantity: Decimal,
}

impl MaxProduction {
    pub const ZERO: MaxProduction = MaxProduction {
        recipe_count: 0,
        product_quantity: Decimal::ZERO,
    };
}
