//! Customer order models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order lifecycle states
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    InProduction,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether an order may move from `self` to `next`.
    ///
    /// Orders advance one step at a time and may be cancelled from any
    /// non-terminal state. Completed and cancelled are terminal.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Confirmed, InProduction) => true,
            (InProduction, Completed) => true,
            (Pending | Confirmed | InProduction, Cancelled) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// Payment state of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

/// One line of a customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub recipe_id: Option<Uuid>,
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub bakery_id: Uuid,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub delivery_date: Option<NaiveDate>,
    pub total_amount: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sum of line totals for an order's items
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        use std::str::FromStr;
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::InProduction));
        assert!(OrderStatus::InProduction.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_cancellation() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::InProduction.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_no_skipping_or_backward() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Confirmed));
    }

    #[test]
    fn test_order_total() {
        let items = vec![
            OrderItem {
                recipe_id: None,
                name: "Croissant".to_string(),
                quantity: dec("12"),
                unit_price: dec("2.50"),
            },
            OrderItem {
                recipe_id: None,
                name: "Baguette".to_string(),
                quantity: dec("2"),
                unit_price: dec("3.00"),
            },
        ];
        assert_eq!(order_total(&items), dec("36.00"));
    }

    #[test]
    fn test_order_total_empty() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }
}
