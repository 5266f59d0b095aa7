//! Order intake and lifecycle service

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{order_total, Order, OrderItem, OrderStatus, PaymentStatus};
use shared::validation::validate_name;

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Input for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub items: Vec<OrderItem>,
    pub delivery_date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Input for a status transition
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: OrderStatus,
}

/// Filter for listing orders
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

/// Row for order queries
#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    bakery_id: Uuid,
    customer_name: String,
    customer_phone: Option<String>,
    items: Json<Vec<OrderItem>>,
    status: String,
    payment_status: String,
    delivery_date: Option<NaiveDate>,
    total_amount: Decimal,
    note: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl OrderRow {
    fn into_order(self) -> AppResult<Order> {
        Ok(Order {
            id: self.id,
            bakery_id: self.bakery_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            items: self.items.0,
            status: parse_status(&self.status)?,
            payment_status: parse_payment_status(&self.payment_status)?,
            delivery_date: self.delivery_date,
            total_amount: self.total_amount,
            note: self.note,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, bakery_id, customer_name, customer_phone, items, status, \
                              payment_status, delivery_date, total_amount, note, created_at, \
                              updated_at";

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an order in the pending state
    pub async fn create_order(&self, bakery_id: Uuid, input: CreateOrderInput) -> AppResult<Order> {
        validate_name(&input.customer_name).map_err(|msg| AppError::Validation {
            field: "customer_name".to_string(),
            message: msg.to_string(),
        })?;
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Order must have at least one item".to_string(),
            });
        }
        for item in &input.items {
            if item.quantity <= Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "items".to_string(),
                    message: "Item quantities must be positive".to_string(),
                });
            }
            if item.unit_price < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "items".to_string(),
                    message: "Item prices cannot be negative".to_string(),
                });
            }
        }

        let total_amount = order_total(&input.items);

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (bakery_id, customer_name, customer_phone, items,
                                status, payment_status, delivery_date, total_amount, note)
            VALUES ($1, $2, $3, $4, 'pending', 'unpaid', $5, $6, $7)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(bakery_id)
        .bind(&input.customer_name)
        .bind(&input.customer_phone)
        .bind(Json(&input.items))
        .bind(input.delivery_date)
        .bind(total_amount)
        .bind(&input.note)
        .fetch_one(&self.db)
        .await?;

        row.into_order()
    }

    /// List orders, newest first, optionally filtered by status
    pub async fn list_orders(&self, bakery_id: Uuid, filter: OrderFilter) -> AppResult<Vec<Order>> {
        let rows = match filter.status {
            Some(status) => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {SELECT_COLUMNS} FROM orders \
                     WHERE bakery_id = $1 AND status = $2 ORDER BY created_at DESC",
                ))
                .bind(bakery_id)
                .bind(status.as_str())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {SELECT_COLUMNS} FROM orders \
                     WHERE bakery_id = $1 ORDER BY created_at DESC",
                ))
                .bind(bakery_id)
                .fetch_all(&self.db)
                .await?
            }
        };

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Get one order
    pub async fn get_order(&self, bakery_id: Uuid, order_id: Uuid) -> AppResult<Order> {
        self.fetch_row(bakery_id, order_id).await?.into_order()
    }

    /// Advance an order through its lifecycle
    pub async fn update_status(
        &self,
        bakery_id: Uuid,
        order_id: Uuid,
        next: OrderStatus,
    ) -> AppResult<Order> {
        let order = self.get_order(bakery_id, order_id).await?;

        if order.status.is_terminal() {
            return Err(AppError::InvalidStateTransition(format!(
                "Order is already {}",
                order.status.as_str()
            )));
        }
        if !order.status.can_transition_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot move order from {} to {}",
                order.status.as_str(),
                next.as_str()
            )));
        }

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE orders SET status = $1, updated_at = now()
            WHERE id = $2 AND bakery_id = $3
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(next.as_str())
        .bind(order_id)
        .bind(bakery_id)
        .fetch_one(&self.db)
        .await?;

        row.into_order()
    }

    /// Cancel an order (legal from any non-terminal state)
    pub async fn cancel_order(&self, bakery_id: Uuid, order_id: Uuid) -> AppResult<Order> {
        self.update_status(bakery_id, order_id, OrderStatus::Cancelled)
            .await
    }

    /// Set the payment state of an order (driven by webhook ingestion)
    pub async fn set_payment_status(
        &self,
        order_id: Uuid,
        payment_status: PaymentStatus,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET payment_status = $1, updated_at = now() WHERE id = $2",
        )
        .bind(payment_status.as_str())
        .bind(order_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order".to_string()));
        }

        Ok(())
    }

    async fn fetch_row(&self, bakery_id: Uuid, order_id: Uuid) -> AppResult<OrderRow> {
        sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders WHERE id = $1 AND bakery_id = $2",
        ))
        .bind(order_id)
        .bind(bakery_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }
}

fn parse_status(value: &str) -> AppResult<OrderStatus> {
    match value {
        "pending" => Ok(OrderStatus::Pending),
        "confirmed" => Ok(OrderStatus::Confirmed),
        "in_production" => Ok(OrderStatus::InProduction),
        "completed" => Ok(OrderStatus::Completed),
        "cancelled" => Ok(OrderStatus::Cancelled),
        other => Err(AppError::Internal(format!("Unknown order status: {}", other))),
    }
}

fn parse_payment_status(value: &str) -> AppResult<PaymentStatus> {
    match value {
        "unpaid" => Ok(PaymentStatus::Unpaid),
        "paid" => Ok(PaymentStatus::Paid),
        "failed" => Ok(PaymentStatus::Failed),
        "refunded" => Ok(PaymentStatus::Refunded),
        other => Err(AppError::Internal(format!(
            "Unknown payment status: {}",
            other
        ))),
    }
}
