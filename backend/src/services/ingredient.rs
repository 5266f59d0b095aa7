//! Ingredient service: catalog CRUD and the append-only stock ledger
//!
//! Stock balances are never written. The service appends immutable history
//! entries and derives every balance, flag, and costing figure through the
//! pure projections in `shared::stock` at read time. History is append-only
//! at the SQL level too: the update path cannot touch the `history` column,
//! and imports are appended with a `jsonb ||` concat.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    HistoryEntry, HistoryEntryType, Ingredient, IngredientStats, IngredientType,
};
use shared::stock::{self, StockLedger};
use shared::types::Unit;
use shared::validation::{
    validate_import_price, validate_import_quantity, validate_name,
};

/// Ingredient service for catalog and stock-history management
#[derive(Clone)]
pub struct IngredientService {
    db: PgPool,
    ledger: StockLedger,
}

/// Input for creating an ingredient
#[derive(Debug, Deserialize)]
pub struct CreateIngredientInput {
    pub name: String,
    pub ingredient_type: IngredientType,
    pub unit: Unit,
    /// Baseline stock at creation; immutable afterwards
    pub initial_quantity: Option<Decimal>,
}

/// Input for updating ingredient metadata
///
/// Name and unit are edit-locked once history exists, and history itself is
/// never accepted here; corrections go through `record_import`.
#[derive(Debug, Deserialize)]
pub struct UpdateIngredientInput {
    pub name: Option<String>,
    pub ingredient_type: Option<IngredientType>,
    pub unit: Option<Unit>,
}

/// Input for recording a stock import
#[derive(Debug, Deserialize)]
pub struct RecordImportInput {
    /// Signed delta; a negative quantity is an appended correction
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
    pub note: Option<String>,
}

/// An ingredient together with its derived stock statistics
#[derive(Debug, Serialize)]
pub struct IngredientWithStats {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    pub stats: IngredientStats,
}

/// Row for ingredient queries
#[derive(Debug, FromRow)]
struct IngredientRow {
    id: Uuid,
    bakery_id: Uuid,
    name: String,
    ingredient_type: String,
    unit: String,
    initial_quantity: Decimal,
    history: Json<Vec<HistoryEntry>>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl IngredientRow {
    fn into_ingredient(self) -> AppResult<Ingredient> {
        Ok(Ingredient {
            id: self.id,
            bakery_id: self.bakery_id,
            name: self.name,
            ingredient_type: parse_ingredient_type(&self.ingredient_type)?,
            unit: parse_unit(&self.unit)?,
            initial_quantity: self.initial_quantity,
            history: self.history.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, bakery_id, name, ingredient_type, unit, initial_quantity, \
                              history, created_at, updated_at";

impl IngredientService {
    /// Create a new IngredientService instance
    pub fn new(db: PgPool, low_stock_threshold: Decimal) -> Self {
        Self {
            db,
            ledger: StockLedger::new(low_stock_threshold),
        }
    }

    /// Create an ingredient with an empty history
    pub async fn create_ingredient(
        &self,
        bakery_id: Uuid,
        input: CreateIngredientInput,
    ) -> AppResult<IngredientWithStats> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let initial_quantity = input.initial_quantity.unwrap_or(Decimal::ZERO);
        if initial_quantity < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "initial_quantity".to_string(),
                message: "Initial quantity cannot be negative".to_string(),
            });
        }

        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            INSERT INTO ingredients (bakery_id, name, ingredient_type, unit, initial_quantity, history)
            VALUES ($1, $2, $3, $4, $5, '[]'::jsonb)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(bakery_id)
        .bind(&input.name)
        .bind(input.ingredient_type.as_str())
        .bind(input.unit.as_str())
        .bind(initial_quantity)
        .fetch_one(&self.db)
        .await?;

        self.with_stats(row)
    }

    /// List all ingredients for a bakery, with derived stats
    pub async fn list_ingredients(&self, bakery_id: Uuid) -> AppResult<Vec<IngredientWithStats>> {
        let rows = sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM ingredients WHERE bakery_id = $1 ORDER BY name",
        ))
        .bind(bakery_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| self.with_stats(row)).collect()
    }

    /// List ingredients currently in the low-stock band
    pub async fn list_low_stock(&self, bakery_id: Uuid) -> AppResult<Vec<IngredientWithStats>> {
        let all = self.list_ingredients(bakery_id).await?;
        Ok(all
            .into_iter()
            .filter(|entry| entry.stats.is_low_stock)
            .collect())
    }

    /// Get one ingredient with derived stats
    pub async fn get_ingredient(
        &self,
        bakery_id: Uuid,
        ingredient_id: Uuid,
    ) -> AppResult<IngredientWithStats> {
        let row = self.fetch_row(bakery_id, ingredient_id).await?;
        self.with_stats(row)
    }

    /// Update ingredient metadata
    ///
    /// Once the ledger has entries, name and unit are locked so historical
    /// rows keep meaning; only the category may change.
    pub async fn update_ingredient(
        &self,
        bakery_id: Uuid,
        ingredient_id: Uuid,
        input: UpdateIngredientInput,
    ) -> AppResult<IngredientWithStats> {
        let existing = self.fetch_row(bakery_id, ingredient_id).await?;
        let history_len = existing.history.0.len();

        if history_len > 0 && (input.name.is_some() || input.unit.is_some()) {
            return Err(AppError::HistoryImmutable(
                "Name and unit cannot change once stock history exists".to_string(),
            ));
        }

        if let Some(name) = &input.name {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;
        }

        let name = input.name.unwrap_or(existing.name);
        let ingredient_type = input
            .ingredient_type
            .map(|t| t.as_str().to_string())
            .unwrap_or(existing.ingredient_type);
        let unit = input
            .unit
            .map(|u| u.as_str().to_string())
            .unwrap_or(existing.unit);

        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            UPDATE ingredients
            SET name = $1, ingredient_type = $2, unit = $3, updated_at = now()
            WHERE id = $4 AND bakery_id = $5
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(&name)
        .bind(&ingredient_type)
        .bind(&unit)
        .bind(ingredient_id)
        .bind(bakery_id)
        .fetch_one(&self.db)
        .await?;

        self.with_stats(row)
    }

    /// Append an import entry to the ingredient's ledger
    pub async fn record_import(
        &self,
        bakery_id: Uuid,
        ingredient_id: Uuid,
        input: RecordImportInput,
    ) -> AppResult<IngredientWithStats> {
        validate_import_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;
        validate_import_price(input.price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;

        let ingredient = self
            .fetch_row(bakery_id, ingredient_id)
            .await?
            .into_ingredient()?;

        // Resolve supplier attribution and snapshot the name
        let supplier_name = match input.supplier_id {
            Some(supplier_id) => Some(
                sqlx::query_scalar::<_, String>(
                    "SELECT name FROM suppliers WHERE id = $1 AND bakery_id = $2",
                )
                .bind(supplier_id)
                .bind(bakery_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?,
            ),
            None => None,
        };

        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            entry_type: HistoryEntryType::Import,
            from_quantity: stock::current_quantity(&ingredient),
            import_quantity: input.quantity,
            unit: ingredient.unit,
            price: input.price,
            supplier_id: input.supplier_id,
            supplier_name,
            note: input.note,
            created_at: Utc::now(),
        };

        // jsonb concat keeps the write strictly append-only
        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            UPDATE ingredients
            SET history = history || $1::jsonb, updated_at = now()
            WHERE id = $2 AND bakery_id = $3
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(Json(vec![entry]))
        .bind(ingredient_id)
        .bind(bakery_id)
        .fetch_one(&self.db)
        .await?;

        self.with_stats(row)
    }

    /// Full import history for an ingredient, oldest first
    pub async fn get_import_history(
        &self,
        bakery_id: Uuid,
        ingredient_id: Uuid,
    ) -> AppResult<Vec<HistoryEntry>> {
        let row = self.fetch_row(bakery_id, ingredient_id).await?;
        Ok(row.into_ingredient()?.history)
    }

    /// Delete an ingredient and its embedded history
    pub async fn delete_ingredient(&self, bakery_id: Uuid, ingredient_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1 AND bakery_id = $2")
            .bind(ingredient_id)
            .bind(bakery_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }

        Ok(())
    }

    /// Load the full catalog as domain models (for costing calculations)
    pub async fn load_catalog(&self, bakery_id: Uuid) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM ingredients WHERE bakery_id = $1",
        ))
        .bind(bakery_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(IngredientRow::into_ingredient).collect()
    }

    async fn fetch_row(&self, bakery_id: Uuid, ingredient_id: Uuid) -> AppResult<IngredientRow> {
        sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM ingredients WHERE id = $1 AND bakery_id = $2",
        ))
        .bind(ingredient_id)
        .bind(bakery_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))
    }

    fn with_stats(&self, row: IngredientRow) -> AppResult<IngredientWithStats> {
        let ingredient = row.into_ingredient()?;
        let stats = self.ledger.stats(&ingredient);
        Ok(IngredientWithStats { ingredient, stats })
    }
}

fn parse_ingredient_type(value: &str) -> AppResult<IngredientType> {
    match value {
        "base" => Ok(IngredientType::Base),
        "flavor" => Ok(IngredientType::Flavor),
        "topping" => Ok(IngredientType::Topping),
        "decoration" => Ok(IngredientType::Decoration),
        "material" => Ok(IngredientType::Material),
        other => Err(AppError::Internal(format!(
            "Unknown ingredient type: {}",
            other
        ))),
    }
}

fn parse_unit(value: &str) -> AppResult<Unit> {
    match value {
        "g" => Ok(Unit::G),
        "piece" => Ok(Unit::Piece),
        other => Err(AppError::Internal(format!("Unknown unit: {}", other))),
    }
}
