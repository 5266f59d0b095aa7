//! Payment gateway webhook handler
//!
//! The gateway signs the raw body with HMAC-SHA256; we verify before parsing
//! so an unsigned payload never reaches deserialization.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::services::payment::{
    verify_webhook_signature, IngestOutcome, PaymentService, PaymentWebhookPayload,
};
use crate::AppState;

const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Handle a payment gateway webhook delivery
pub async fn handle_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::InvalidWebhookSignature)?;

    verify_webhook_signature(&state.config.payment.webhook_secret, &body, signature)
        .map_err(|_| AppError::InvalidWebhookSignature)?;

    let payload: PaymentWebhookPayload =
        serde_json::from_slice(&body).map_err(|e| AppError::Validation {
            field: "body".to_string(),
            message: format!("Invalid webhook payload: {}", e),
        })?;

    tracing::info!(
        event_id = %payload.event_id,
        order_id = %payload.order_id,
        "Payment webhook received"
    );

    let outcome = PaymentService::new(state.db.clone())
        .ingest_event(payload)
        .await?;

    let status = match outcome {
        IngestOutcome::Processed => "processed",
        IngestOutcome::Duplicate => "duplicate",
    };

    Ok((StatusCode::OK, Json(json!({ "status": status }))))
}
