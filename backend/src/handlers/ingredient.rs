//! Ingredient and stock-ledger handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_manage, CurrentUser};
use crate::models::HistoryEntry;
use crate::services::ingredient::{
    CreateIngredientInput, IngredientService, IngredientWithStats, RecordImportInput,
    UpdateIngredientInput,
};
use crate::AppState;

fn service(state: &AppState) -> IngredientService {
    IngredientService::new(state.db.clone(), state.config.inventory.low_stock_threshold)
}

/// List all ingredients with derived stock stats
pub async fn list_ingredients(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<IngredientWithStats>>> {
    let ingredients = service(&state).list_ingredients(user.bakery_id).await?;
    Ok(Json(ingredients))
}

/// List ingredients currently below the low-stock threshold
pub async fn list_low_stock(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<IngredientWithStats>>> {
    let ingredients = service(&state).list_low_stock(user.bakery_id).await?;
    Ok(Json(ingredients))
}

/// Create a new ingredient
pub async fn create_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateIngredientInput>,
) -> AppResult<(StatusCode, Json<IngredientWithStats>)> {
    require_manage(&user)?;
    let ingredient = service(&state)
        .create_ingredient(user.bakery_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// Get one ingredient with derived stock stats
pub async fn get_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<IngredientWithStats>> {
    let ingredient = service(&state)
        .get_ingredient(user.bakery_id, ingredient_id)
        .await?;
    Ok(Json(ingredient))
}

/// Update ingredient metadata
pub async fn update_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ingredient_id): Path<Uuid>,
    Json(input): Json<UpdateIngredientInput>,
) -> AppResult<Json<IngredientWithStats>> {
    require_manage(&user)?;
    let ingredient = service(&state)
        .update_ingredient(user.bakery_id, ingredient_id, input)
        .await?;
    Ok(Json(ingredient))
}

/// Delete an ingredient
pub async fn delete_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_manage(&user)?;
    service(&state)
        .delete_ingredient(user.bakery_id, ingredient_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a stock import to the ingredient's ledger
pub async fn record_import(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ingredient_id): Path<Uuid>,
    Json(input): Json<RecordImportInput>,
) -> AppResult<(StatusCode, Json<IngredientWithStats>)> {
    require_manage(&user)?;
    let ingredient = service(&state)
        .record_import(user.bakery_id, ingredient_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// Full import history for an ingredient, oldest first
pub async fn get_import_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let history = service(&state)
        .get_import_history(user.bakery_id, ingredient_id)
        .await?;
    Ok(Json(history))
}
