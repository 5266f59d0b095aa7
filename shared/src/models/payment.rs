//! Payment webhook event models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Webhook event kinds the payment gateway delivers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentEventType {
    PaymentSucceeded,
    PaymentFailed,
    PaymentRefunded,
}

impl PaymentEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentEventType::PaymentSucceeded => "payment_succeeded",
            PaymentEventType::PaymentFailed => "payment_failed",
            PaymentEventType::PaymentRefunded => "payment_refunded",
        }
    }
}

/// A payment event as received from the gateway webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    /// Gateway-assigned event id; ingestion is idempotent on this key
    pub event_id: String,
    pub event_type: PaymentEventType,
    pub order_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    /// Gateway transaction reference
    pub transaction_ref: Option<String>,
    pub received_at: DateTime<Utc>,
}
