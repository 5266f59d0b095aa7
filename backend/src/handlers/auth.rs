//! Authentication handlers

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::auth::{
    AuthService, AuthTokens, LoginInput, RefreshInput, RegisterBakeryInput, RegisterResponse,
};
use crate::AppState;

/// Register a new bakery with its owner account
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterBakeryInput>,
) -> AppResult<Json<RegisterResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let response = service.register_bakery(input).await?;

    tracing::info!(bakery_id = %response.bakery_id, "New bakery registered");

    Ok(Json(response))
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.login(input).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new token pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.refresh(input).await?;
    Ok(Json(tokens))
}
