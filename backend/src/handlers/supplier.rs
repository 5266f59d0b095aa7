//! Supplier handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_manage, CurrentUser};
use crate::models::Supplier;
use crate::services::supplier::{CreateSupplierInput, SupplierService, UpdateSupplierInput};
use crate::AppState;

/// List suppliers, active first
pub async fn list_suppliers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = SupplierService::new(state.db.clone())
        .list_suppliers(user.bakery_id)
        .await?;
    Ok(Json(suppliers))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    require_manage(&user)?;
    let supplier = SupplierService::new(state.db.clone())
        .create_supplier(user.bakery_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Get one supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let supplier = SupplierService::new(state.db.clone())
        .get_supplier(user.bakery_id, supplier_id)
        .await?;
    Ok(Json(supplier))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<UpdateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    require_manage(&user)?;
    let supplier = SupplierService::new(state.db.clone())
        .update_supplier(user.bakery_id, supplier_id, input)
        .await?;
    Ok(Json(supplier))
}

/// Retire a supplier (soft delete)
pub async fn deactivate_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_manage(&user)?;
    SupplierService::new(state.db.clone())
        .deactivate_supplier(user.bakery_id, supplier_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
