//! CSV export service for the admin dashboard's download buttons
//!
//! Exports read the same derived stats the dashboard renders; there is no
//! separate export-side stock math.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ingredient::IngredientService;
use crate::services::order::{OrderFilter, OrderService};

/// Export service
#[derive(Clone)]
pub struct ExportService {
    db: PgPool,
    low_stock_threshold: Decimal,
}

/// One row of the ingredient stock report
#[derive(Debug, Serialize)]
struct IngredientExportRow {
    name: String,
    ingredient_type: String,
    unit: String,
    current_quantity: Decimal,
    total_imported_quantity: Decimal,
    average_price: Option<Decimal>,
    total_import_value: Decimal,
    low_stock: bool,
    out_of_stock: bool,
    last_import_date: Option<String>,
}

/// One row of the orders report
#[derive(Debug, Serialize)]
struct OrderExportRow {
    order_id: Uuid,
    customer_name: String,
    status: String,
    payment_status: String,
    item_count: usize,
    total_amount: Decimal,
    delivery_date: Option<String>,
    created_at: String,
}

impl ExportService {
    /// Create a new ExportService instance
    pub fn new(db: PgPool, low_stock_threshold: Decimal) -> Self {
        Self {
            db,
            low_stock_threshold,
        }
    }

    /// Ingredient stock report as CSV
    pub async fn export_ingredients(&self, bakery_id: Uuid) -> AppResult<String> {
        let service = IngredientService::new(self.db.clone(), self.low_stock_threshold);
        let ingredients = service.list_ingredients(bakery_id).await?;

        let rows: Vec<IngredientExportRow> = ingredients
            .into_iter()
            .map(|entry| IngredientExportRow {
                name: entry.ingredient.name,
                ingredient_type: entry.ingredient.ingredient_type.as_str().to_string(),
                unit: entry.ingredient.unit.as_str().to_string(),
                current_quantity: entry.stats.current_quantity,
                total_imported_quantity: entry.stats.total_imported_quantity,
                average_price: entry.stats.average_price,
                total_import_value: entry.stats.total_import_value,
                low_stock: entry.stats.is_low_stock,
                out_of_stock: entry.stats.is_out_of_stock,
                last_import_date: entry.stats.last_import_date.map(|d| d.to_rfc3339()),
            })
            .collect();

        to_csv(&rows)
    }

    /// Orders report as CSV
    pub async fn export_orders(&self, bakery_id: Uuid) -> AppResult<String> {
        let service = OrderService::new(self.db.clone());
        let orders = service.list_orders(bakery_id, OrderFilter::default()).await?;

        let rows: Vec<OrderExportRow> = orders
            .into_iter()
            .map(|order| OrderExportRow {
                order_id: order.id,
                customer_name: order.customer_name,
                status: order.status.as_str().to_string(),
                payment_status: order.payment_status.as_str().to_string(),
                item_count: order.items.len(),
                total_amount: order.total_amount,
                delivery_date: order.delivery_date.map(|d| d.to_string()),
                created_at: order.created_at.to_rfc3339(),
            })
            .collect();

        to_csv(&rows)
    }
}

/// Serialize rows to a CSV string with a header row
fn to_csv<T: Serialize>(rows: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(data).map_err(|e| AppError::Internal(format!("CSV encoding error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_csv_includes_header_and_rows() {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
            quantity: i32,
        }

        let csv = to_csv(&[
            Row {
                name: "Flour",
                quantity: 500,
            },
            Row {
                name: "Sugar",
                quantity: 200,
            },
        ])
        .unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,quantity"));
        assert_eq!(lines.next(), Some("Flour,500"));
        assert_eq!(lines.next(), Some("Sugar,200"));
    }

    #[test]
    fn test_to_csv_empty() {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
        }
        let rows: Vec<Row> = vec![];
        assert_eq!(to_csv(&rows).unwrap(), "");
    }
}
