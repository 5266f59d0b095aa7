//! CSV export handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::export::ExportService;
use crate::AppState;

fn csv_response(filename: &str, csv: String) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
}

/// Download the ingredient stock report
pub async fn export_ingredients_csv(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let csv = ExportService::new(state.db.clone(), state.config.inventory.low_stock_threshold)
        .export_ingredients(user.bakery_id)
        .await?;
    Ok(csv_response("ingredients.csv", csv))
}

/// Download the orders report
pub async fn export_orders_csv(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let csv = ExportService::new(state.db.clone(), state.config.inventory.low_stock_threshold)
        .export_orders(user.bakery_id)
        .await?;
    Ok(csv_response("orders.csv", csv))
}
