//! Payment webhook ingestion service
//!
//! Verifies gateway signatures, records events idempotently (keyed on the
//! gateway's event id), and updates the referenced order's payment state.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{PaymentEvent, PaymentEventType, PaymentStatus};
use crate::services::order::OrderService;

type HmacSha256 = Hmac<Sha256>;

/// Payment service
#[derive(Clone)]
pub struct PaymentService {
    db: PgPool,
}

/// Webhook payload as the gateway sends it
#[derive(Debug, Deserialize)]
pub struct PaymentWebhookPayload {
    pub event_id: String,
    pub event_type: PaymentEventType,
    pub order_id: Uuid,
    pub amount: rust_decimal::Decimal,
    pub currency: String,
    pub transaction_ref: Option<String>,
}

/// Outcome of ingesting one webhook delivery
#[derive(Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    Processed,
    /// The gateway retried an event we already recorded
    Duplicate,
}

/// Verify the gateway's HMAC-SHA256 signature over the raw request body.
///
/// The gateway signs the exact bytes it sends; any reserialization before
/// verification would break the comparison, so callers must pass the raw
/// body.
pub fn verify_webhook_signature(
    secret: &str,
    body: &[u8],
    signature: &str,
) -> Result<(), &'static str> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| "Failed to create HMAC")?;
    mac.update(body);
    let expected = BASE64.encode(mac.finalize().into_bytes());

    if signature != expected {
        return Err("Signature mismatch");
    }

    Ok(())
}

impl PaymentService {
    /// Create a new PaymentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a verified webhook event and apply it to the order.
    ///
    /// Idempotent on the gateway event id: a retried delivery is acknowledged
    /// without re-applying the payment state change.
    pub async fn ingest_event(&self, payload: PaymentWebhookPayload) -> AppResult<IngestOutcome> {
        let event = PaymentEvent {
            event_id: payload.event_id,
            event_type: payload.event_type,
            order_id: payload.order_id,
            amount: payload.amount,
            currency: payload.currency,
            transaction_ref: payload.transaction_ref,
            received_at: Utc::now(),
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO payment_events (event_id, event_type, order_id, amount, currency,
                                        transaction_ref, received_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(&event.event_id)
        .bind(event.event_type.as_str())
        .bind(event.order_id)
        .bind(event.amount)
        .bind(&event.currency)
        .bind(&event.transaction_ref)
        .bind(event.received_at)
        .execute(&self.db)
        .await?
        .rows_affected();

        if inserted == 0 {
            tracing::info!(event_id = %event.event_id, "Duplicate payment event ignored");
            return Ok(IngestOutcome::Duplicate);
        }

        let payment_status = match event.event_type {
            PaymentEventType::PaymentSucceeded => PaymentStatus::Paid,
            PaymentEventType::PaymentFailed => PaymentStatus::Failed,
            PaymentEventType::PaymentRefunded => PaymentStatus::Refunded,
        };

        let orders = OrderService::new(self.db.clone());
        match orders.set_payment_status(event.order_id, payment_status).await {
            Ok(()) => {}
            // The event is recorded even when the order is gone; operators
            // can reconcile from the payment_events table
            Err(AppError::NotFound(_)) => {
                tracing::warn!(
                    order_id = %event.order_id,
                    event_id = %event.event_id,
                    "Payment event for unknown order"
                );
            }
            Err(e) => return Err(e),
        }

        Ok(IngestOutcome::Processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let body = br#"{"event_id":"evt_1"}"#;
        let signature = sign("topsecret", body);
        assert!(verify_webhook_signature("topsecret", body, &signature).is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let signature = sign("topsecret", br#"{"amount":10}"#);
        assert!(verify_webhook_signature("topsecret", br#"{"amount":99}"#, &signature).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = br#"{"event_id":"evt_1"}"#;
        let signature = sign("other-secret", body);
        assert!(verify_webhook_signature("topsecret", body, &signature).is_err());
    }

    #[test]
    fn test_garbage_signature_rejected() {
        assert!(verify_webhook_signature("topsecret", b"{}", "not-base64!").is_err());
    }
}
