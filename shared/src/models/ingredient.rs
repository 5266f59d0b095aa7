//! Ingredient and stock-history models
//!
//! Stock is never stored as a mutable balance. An ingredient carries its
//! immutable `initial_quantity` and an append-only `history` of stock events;
//! the current balance is always re-derived from those (see `crate::stock`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Unit;

/// Ingredient categories used by the bakery
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IngredientType {
    /// Dough/batter staples (flour, sugar, butter)
    Base,
    Flavor,
    Topping,
    Decoration,
    /// Non-edible materials (boxes, liners, ribbons)
    Material,
}

impl IngredientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientType::Base => "base",
            IngredientType::Flavor => "flavor",
            IngredientType::Topping => "topping",
            IngredientType::Decoration => "decoration",
            IngredientType::Material => "material",
        }
    }
}

/// Types of stock-history events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryEntryType {
    /// Stock received from a supplier (or a signed correction)
    Import,
    /// Stock consumed by production. Reserved: recorded entries of this type
    /// are accepted but do not yet contribute to the balance.
    Usage,
}

impl HistoryEntryType {
    /// Signed contribution of an entry of this type to the stock balance.
    ///
    /// Keeping the rule here means enabling real usage tracking later is a
    /// one-line change instead of a new branch in every fold.
    pub fn contribution(&self, quantity: Decimal) -> Decimal {
        match self {
            HistoryEntryType::Import => quantity,
            HistoryEntryType::Usage => Decimal::ZERO,
        }
    }
}

/// One immutable stock-affecting event in an ingredient's ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub entry_type: HistoryEntryType,
    /// Balance snapshot taken just before the event, informational only
    #[serde(default)]
    pub from_quantity: Decimal,
    /// Signed quantity delta; negative imports are appended corrections
    #[serde(default)]
    pub import_quantity: Decimal,
    #[serde(default)]
    pub unit: Unit,
    /// Cost per unit for this import, when known
    pub price: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
    /// Snapshot of the supplier name so the ledger survives supplier deletion
    pub supplier_name: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A trackable raw material with a stock balance derived from history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub bakery_id: Uuid,
    pub name: String,
    pub ingredient_type: IngredientType,
    pub unit: Unit,
    /// Baseline stock set at creation, immutable thereafter
    #[serde(default)]
    pub initial_quantity: Decimal,
    /// Append-only ledger of stock events, ordered by `created_at`
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived per-ingredient stock statistics, recomputed on every read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientStats {
    pub current_quantity: Decimal,
    pub total_imported_quantity: Decimal,
    pub is_low_stock: bool,
    pub is_out_of_stock: bool,
    pub last_import_date: Option<DateTime<Utc>>,
    pub average_price: Option<Decimal>,
    pub total_import_value: Decimal,
}
