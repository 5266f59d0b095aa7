//! Recipe and production-calculation handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{require_manage, CurrentUser};
use crate::models::Recipe;
use crate::services::ingredient::IngredientService;
use crate::services::recipe::{
    BatchesForResponse, MaxProductionResponse, RecipeInput, RecipeService, RequirementsResponse,
};
use crate::AppState;

fn service(state: &AppState) -> RecipeService {
    let ingredients =
        IngredientService::new(state.db.clone(), state.config.inventory.low_stock_threshold);
    RecipeService::new(state.db.clone(), ingredients)
}

/// Query parameters for the requirements calculation
#[derive(Debug, Deserialize)]
pub struct RequirementsQuery {
    /// Defaults to one batch when absent
    pub batch_count: Option<Decimal>,
}

/// Query parameters for the forward batch calculation
#[derive(Debug, Deserialize)]
pub struct BatchesForQuery {
    pub target_quantity: Decimal,
}

/// List all recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Recipe>>> {
    let recipes = service(&state).list_recipes(user.bakery_id).await?;
    Ok(Json(recipes))
}

/// Create a recipe
pub async fn create_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<RecipeInput>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    require_manage(&user)?;
    let recipe = service(&state).create_recipe(user.bakery_id, input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Get one recipe
pub async fn get_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<Recipe>> {
    let recipe = service(&state).get_recipe(user.bakery_id, recipe_id).await?;
    Ok(Json(recipe))
}

/// Replace a recipe definition
pub async fn update_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
    Json(input): Json<RecipeInput>,
) -> AppResult<Json<Recipe>> {
    require_manage(&user)?;
    let recipe = service(&state)
        .update_recipe(user.bakery_id, recipe_id, input)
        .await?;
    Ok(Json(recipe))
}

/// Delete a recipe
pub async fn delete_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_manage(&user)?;
    service(&state)
        .delete_recipe(user.bakery_id, recipe_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ingredient requirements for a recipe at a given batch count
pub async fn get_recipe_requirements(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
    Query(query): Query<RequirementsQuery>,
) -> AppResult<Json<RequirementsResponse>> {
    let batch_count = query.batch_count.unwrap_or(Decimal::ONE);
    let response = service(&state)
        .requirements(user.bakery_id, recipe_id, batch_count)
        .await?;
    Ok(Json(response))
}

/// Maximum producible batches given current stock
pub async fn get_max_production(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<MaxProductionResponse>> {
    let response = service(&state)
        .max_production(user.bakery_id, recipe_id)
        .await?;
    Ok(Json(response))
}

/// Batches needed to net a target output quantity after waste
pub async fn get_batches_for(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
    Query(query): Query<BatchesForQuery>,
) -> AppResult<Json<BatchesForResponse>> {
    if query.target_quantity <= Decimal::ZERO {
        return Err(AppError::Validation {
            field: "target_quantity".to_string(),
            message: "Target quantity must be positive".to_string(),
        });
    }
    let response = service(&state)
        .batches_for(user.bakery_id, recipe_id, query.target_quantity)
        .await?;
    Ok(Json(response))
}
