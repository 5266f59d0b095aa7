//! Supplier management service

use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Supplier;
use shared::validation::{validate_email, validate_name};

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Input for creating a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

/// Input for updating a supplier
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
    pub is_active: Option<bool>,
}

/// Row for supplier queries
#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    bakery_id: Uuid,
    name: String,
    contact_name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    note: Option<String>,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            bakery_id: row.bakery_id,
            name: row.name,
            contact_name: row.contact_name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            note: row.note,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, bakery_id, name, contact_name, phone, email, address, note, \
                              is_active, created_at, updated_at";

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a supplier
    pub async fn create_supplier(
        &self,
        bakery_id: Uuid,
        input: CreateSupplierInput,
    ) -> AppResult<Supplier> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            INSERT INTO suppliers (bakery_id, name, contact_name, phone, email, address, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(bakery_id)
        .bind(&input.name)
        .bind(&input.contact_name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.note)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List suppliers for a bakery, active first
    pub async fn list_suppliers(&self, bakery_id: Uuid) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM suppliers WHERE bakery_id = $1 \
             ORDER BY is_active DESC, name",
        ))
        .bind(bakery_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    /// Get one supplier
    pub async fn get_supplier(&self, bakery_id: Uuid, supplier_id: Uuid) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM suppliers WHERE id = $1 AND bakery_id = $2",
        ))
        .bind(supplier_id)
        .bind(bakery_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(row.into())
    }

    /// Update a supplier
    pub async fn update_supplier(
        &self,
        bakery_id: Uuid,
        supplier_id: Uuid,
        input: UpdateSupplierInput,
    ) -> AppResult<Supplier> {
        let existing = self.get_supplier(bakery_id, supplier_id).await?;

        if let Some(name) = &input.name {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            UPDATE suppliers
            SET name = $1, contact_name = $2, phone = $3, email = $4, address = $5,
                note = $6, is_active = $7, updated_at = now()
            WHERE id = $8 AND bakery_id = $9
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(input.name.unwrap_or(existing.name))
        .bind(input.contact_name.or(existing.contact_name))
        .bind(input.phone.or(existing.phone))
        .bind(input.email.or(existing.email))
        .bind(input.address.or(existing.address))
        .bind(input.note.or(existing.note))
        .bind(input.is_active.unwrap_or(existing.is_active))
        .bind(supplier_id)
        .bind(bakery_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Retire a supplier. History entries keep their snapshotted name, so
    /// this is a soft delete.
    pub async fn deactivate_supplier(&self, bakery_id: Uuid, supplier_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE suppliers SET is_active = false, updated_at = now() \
             WHERE id = $1 AND bakery_id = $2",
        )
        .bind(supplier_id)
        .bind(bakery_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }
}
