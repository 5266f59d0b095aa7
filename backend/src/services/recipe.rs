//! Recipe service: CRUD plus requirement and capacity calculations
//!
//! The calculations themselves are the pure functions in `shared::costing`;
//! this service only assembles their inputs (recipe + ingredient catalog)
//! from the database and shapes the responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    IngredientRequirement, MaxProduction, Recipe, RecipeIngredient, RecipeType,
};
use crate::services::ingredient::IngredientService;
use shared::costing;
use shared::validation::{
    validate_base_recipe_link, validate_name, validate_output_quantity,
    validate_recipe_ingredients, validate_waste_rate,
};

/// Recipe service
#[derive(Clone)]
pub struct RecipeService {
    db: PgPool,
    ingredients: IngredientService,
}

/// Input for creating or replacing a recipe
#[derive(Debug, Deserialize)]
pub struct RecipeInput {
    pub name: String,
    pub description: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub output_quantity: Decimal,
    pub waste_rate: Option<Decimal>,
    pub recipe_type: Option<RecipeType>,
    pub base_recipe_id: Option<Uuid>,
}

/// Requirement listing for a recipe at a given batch count
#[derive(Debug, Serialize)]
pub struct RequirementsResponse {
    pub recipe_id: Uuid,
    pub batch_count: Decimal,
    /// `None` when the request was not computable (no lines or batch count
    /// out of range), as opposed to an empty computed listing
    pub requirements: Option<Vec<IngredientRequirement>>,
    pub all_sufficient: bool,
}

/// Production capacity for a recipe given current stock
#[derive(Debug, Serialize)]
pub struct MaxProductionResponse {
    pub recipe_id: Uuid,
    #[serde(flatten)]
    pub max: MaxProduction,
    /// Expected good output after waste: `recipe_count` batches shrunk by the
    /// recipe's waste rate. Display figure; capacity above stays pre-waste.
    pub expected_final_quantity: Decimal,
}

/// Forward batch calculation for a target output quantity
#[derive(Debug, Serialize)]
pub struct BatchesForResponse {
    pub recipe_id: Uuid,
    pub target_quantity: Decimal,
    /// Fractional batches needed; rounding policy belongs to the caller
    pub batch_count: Decimal,
    /// Convenience ceiling for operators planning whole batches
    pub whole_batches: Decimal,
}

/// Row for recipe queries
#[derive(Debug, FromRow)]
struct RecipeRow {
    id: Uuid,
    bakery_id: Uuid,
    name: String,
    description: Option<String>,
    ingredients: Json<Vec<RecipeIngredient>>,
    output_quantity: Decimal,
    waste_rate: Decimal,
    recipe_type: String,
    base_recipe_id: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl RecipeRow {
    fn into_recipe(self) -> AppResult<Recipe> {
        Ok(Recipe {
            id: self.id,
            bakery_id: self.bakery_id,
            name: self.name,
            description: self.description,
            ingredients: self.ingredients.0,
            output_quantity: self.output_quantity,
            waste_rate: self.waste_rate,
            recipe_type: parse_recipe_type(&self.recipe_type)?,
            base_recipe_id: self.base_recipe_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, bakery_id, name, description, ingredients, output_quantity, \
                              waste_rate, recipe_type, base_recipe_id, created_at, updated_at";

impl RecipeService {
    /// Create a new RecipeService instance
    pub fn new(db: PgPool, ingredients: IngredientService) -> Self {
        Self { db, ingredients }
    }

    /// Create a recipe
    pub async fn create_recipe(&self, bakery_id: Uuid, input: RecipeInput) -> AppResult<Recipe> {
        self.validate_input(bakery_id, &input).await?;

        let recipe_type = input.recipe_type.unwrap_or_default();
        let waste_rate = input.waste_rate.unwrap_or(Decimal::ZERO);

        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            r#"
            INSERT INTO recipes (bakery_id, name, description, ingredients, output_quantity,
                                 waste_rate, recipe_type, base_recipe_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(bakery_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(Json(&input.ingredients))
        .bind(input.output_quantity)
        .bind(waste_rate)
        .bind(recipe_type.as_str())
        .bind(input.base_recipe_id)
        .fetch_one(&self.db)
        .await?;

        row.into_recipe()
    }

    /// List all recipes for a bakery
    pub async fn list_recipes(&self, bakery_id: Uuid) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM recipes WHERE bakery_id = $1 ORDER BY name",
        ))
        .bind(bakery_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(RecipeRow::into_recipe).collect()
    }

    /// Get one recipe
    pub async fn get_recipe(&self, bakery_id: Uuid, recipe_id: Uuid) -> AppResult<Recipe> {
        self.fetch_row(bakery_id, recipe_id).await?.into_recipe()
    }

    /// Replace a recipe definition
    pub async fn update_recipe(
        &self,
        bakery_id: Uuid,
        recipe_id: Uuid,
        input: RecipeInput,
    ) -> AppResult<Recipe> {
        self.validate_input(bakery_id, &input).await?;

        let recipe_type = input.recipe_type.unwrap_or_default();
        let waste_rate = input.waste_rate.unwrap_or(Decimal::ZERO);

        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            r#"
            UPDATE recipes
            SET name = $1, description = $2, ingredients = $3, output_quantity = $4,
                waste_rate = $5, recipe_type = $6, base_recipe_id = $7, updated_at = now()
            WHERE id = $8 AND bakery_id = $9
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(Json(&input.ingredients))
        .bind(input.output_quantity)
        .bind(waste_rate)
        .bind(recipe_type.as_str())
        .bind(input.base_recipe_id)
        .bind(recipe_id)
        .bind(bakery_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        row.into_recipe()
    }

    /// Delete a recipe
    pub async fn delete_recipe(&self, bakery_id: Uuid, recipe_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND bakery_id = $2")
            .bind(recipe_id)
            .bind(bakery_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe".to_string()));
        }

        Ok(())
    }

    /// Requirement listing: can the bakery make `batch_count` batches now?
    pub async fn requirements(
        &self,
        bakery_id: Uuid,
        recipe_id: Uuid,
        batch_count: Decimal,
    ) -> AppResult<RequirementsResponse> {
        let recipe = self.get_recipe(bakery_id, recipe_id).await?;
        let catalog = self.ingredients.load_catalog(bakery_id).await?;

        let requirements =
            costing::calculate_requirements(&recipe.ingredients, &catalog, batch_count);
        let all_sufficient = costing::all_sufficient(requirements.as_deref());

        Ok(RequirementsResponse {
            recipe_id,
            batch_count,
            requirements,
            all_sufficient,
        })
    }

    /// Maximum producible batches given current stock
    pub async fn max_production(
        &self,
        bakery_id: Uuid,
        recipe_id: Uuid,
    ) -> AppResult<MaxProductionResponse> {
        let recipe = self.get_recipe(bakery_id, recipe_id).await?;
        let catalog = self.ingredients.load_catalog(bakery_id).await?;

        let max =
            costing::max_possible_production(&recipe.ingredients, &catalog, recipe.output_quantity);
        let per_batch_final = costing::final_quantity(recipe.output_quantity, recipe.waste_rate);
        let expected_final_quantity = Decimal::from(max.recipe_count) * per_batch_final;

        Ok(MaxProductionResponse {
            recipe_id,
            max,
            expected_final_quantity,
        })
    }

    /// Batches needed to net a target quantity after waste
    pub async fn batches_for(
        &self,
        bakery_id: Uuid,
        recipe_id: Uuid,
        target_quantity: Decimal,
    ) -> AppResult<BatchesForResponse> {
        let recipe = self.get_recipe(bakery_id, recipe_id).await?;

        let batch_count = costing::required_batch_count(
            target_quantity,
            recipe.output_quantity,
            recipe.waste_rate,
        );

        Ok(BatchesForResponse {
            recipe_id,
            target_quantity,
            batch_count,
            whole_batches: batch_count.ceil(),
        })
    }

    async fn validate_input(&self, bakery_id: Uuid, input: &RecipeInput) -> AppResult<()> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_recipe_ingredients(&input.ingredients).map_err(|msg| AppError::Validation {
            field: "ingredients".to_string(),
            message: msg.to_string(),
        })?;
        validate_output_quantity(input.output_quantity).map_err(|msg| AppError::Validation {
            field: "output_quantity".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(waste_rate) = input.waste_rate {
            validate_waste_rate(waste_rate).map_err(|msg| AppError::Validation {
                field: "waste_rate".to_string(),
                message: msg.to_string(),
            })?;
        }

        let recipe_type = input.recipe_type.unwrap_or_default();
        validate_base_recipe_link(recipe_type, input.base_recipe_id.is_some()).map_err(|msg| {
            AppError::Validation {
                field: "base_recipe_id".to_string(),
                message: msg.to_string(),
            }
        })?;

        // The link is navigational only, but it must point at a real base recipe
        if let Some(base_id) = input.base_recipe_id {
            let base_type = sqlx::query_scalar::<_, String>(
                "SELECT recipe_type FROM recipes WHERE id = $1 AND bakery_id = $2",
            )
            .bind(base_id)
            .bind(bakery_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Base recipe".to_string()))?;

            if base_type != "base" {
                return Err(AppError::Validation {
                    field: "base_recipe_id".to_string(),
                    message: "Referenced recipe is not a base recipe".to_string(),
                });
            }
        }

        Ok(())
    }

    async fn fetch_row(&self, bakery_id: Uuid, recipe_id: Uuid) -> AppResult<RecipeRow> {
        sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM recipes WHERE id = $1 AND bakery_id = $2",
        ))
        .bind(recipe_id)
        .bind(bakery_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe".to_string()))
    }
}

fn parse_recipe_type(value: &str) -> AppResult<RecipeType> {
    match value {
        "base" => Ok(RecipeType::Base),
        "full" => Ok(RecipeType::Full),
        other => Err(AppError::Internal(format!("Unknown recipe type: {}", other))),
    }
}
