//! Order handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::Order;
use crate::services::order::{
    CreateOrderInput, OrderFilter, OrderService, UpdateStatusInput,
};
use crate::AppState;

/// List orders, newest first, optionally filtered by status
pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = OrderService::new(state.db.clone())
        .list_orders(user.bakery_id, filter)
        .await?;
    Ok(Json(orders))
}

/// Create an order in the pending state
pub async fn create_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = OrderService::new(state.db.clone())
        .create_order(user.bakery_id, input)
        .await?;

    tracing::info!(order_id = %order.id, total = %order.total_amount, "Order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// Get one order
pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = OrderService::new(state.db.clone())
        .get_order(user.bakery_id, order_id)
        .await?;
    Ok(Json(order))
}

/// Advance an order through its lifecycle
pub async fn update_order_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<Order>> {
    let order = OrderService::new(state.db.clone())
        .update_status(user.bakery_id, order_id, input.status)
        .await?;
    Ok(Json(order))
}

/// Cancel an order
pub async fn cancel_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = OrderService::new(state.db.clone())
        .cancel_order(user.bakery_id, order_id)
        .await?;
    Ok(Json(order))
}
