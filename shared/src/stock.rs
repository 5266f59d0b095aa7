//! Stock ledger: pure projections of an ingredient's history
//!
//! Stock levels are never stored. Each read folds the ingredient's immutable
//! `initial_quantity` and its append-only history into derived stats. The
//! functions here are total: missing optional fields default to zero/empty so
//! legacy records (created before schema additions) always render.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{HistoryEntryType, Ingredient, IngredientStats};

/// Default low-stock threshold, in the ingredient's own unit
pub const DEFAULT_LOW_STOCK_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// Total signed contribution of all history entries.
///
/// Each entry contributes according to its type (imports add their quantity,
/// usage entries are reserved and contribute zero for now).
pub fn total_imported(ingredient: &Ingredient) -> Decimal {
    ingredient
        .history
        .iter()
        .map(|entry| entry.entry_type.contribution(entry.import_quantity))
        .sum()
}

/// Current stock balance: `initial_quantity` plus the folded history.
///
/// Deliberately unclamped. Once usage entries contribute negatively, an
/// over-consumed ingredient must show a negative balance so operators can
/// see it.
pub fn current_quantity(ingredient: &Ingredient) -> Decimal {
    ingredient.initial_quantity + total_imported(ingredient)
}

/// Simple average of `price` across import entries that carry one.
///
/// `None` when no priced imports exist. A simple (unweighted) average was
/// chosen over a quantity-weighted one; `total_import_value` provides the
/// weighted aggregate for costing.
pub fn average_price(ingredient: &Ingredient) -> Option<Decimal> {
    let mut sum = Decimal::ZERO;
    let mut count = 0u32;
    for entry in &ingredient.history {
        if entry.entry_type == HistoryEntryType::Import {
            if let Some(price) = entry.price {
                sum += price;
                count += 1;
            }
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / Decimal::from(count))
    }
}

/// Total purchase value: `sum(price * import_quantity)` over priced imports.
///
/// Unpriced imports contribute zero value but still move quantity.
pub fn total_import_value(ingredient: &Ingredient) -> Decimal {
    ingredient
        .history
        .iter()
        .filter(|entry| entry.entry_type == HistoryEntryType::Import)
        .filter_map(|entry| entry.price.map(|price| price * entry.import_quantity))
        .sum()
}

/// Most recent import timestamp, `None` when no imports exist
pub fn last_import_date(ingredient: &Ingredient) -> Option<DateTime<Utc>> {
    ingredient
        .history
        .iter()
        .filter(|entry| entry.entry_type == HistoryEntryType::Import)
        .map(|entry| entry.created_at)
        .max()
}

/// Stock ledger with a configured low-stock threshold.
///
/// The threshold is deployment configuration (default 100) rather than a
/// literal inside the logic.
#[derive(Debug, Clone, Copy)]
pub struct StockLedger {
    pub low_stock_threshold: Decimal,
}

impl Default for StockLedger {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl StockLedger {
    pub fn new(low_stock_threshold: Decimal) -> Self {
        Self {
            low_stock_threshold,
        }
    }

    /// Low stock means strictly between zero and the threshold. A zero or
    /// negative balance is out-of-stock, a distinct condition.
    pub fn is_low_stock(&self, ingredient: &Ingredient) -> bool {
        let current = current_quantity(ingredient);
        current > Decimal::ZERO && current < self.low_stock_threshold
    }

    pub fn is_out_of_stock(&self, ingredient: &Ingredient) -> bool {
        current_quantity(ingredient) <= Decimal::ZERO
    }

    /// All derived stats for one ingredient in a single pass set
    pub fn stats(&self, ingredient: &Ingredient) -> IngredientStats {
        IngredientStats {
            current_quantity: current_quantity(ingredient),
            total_imported_quantity: total_imported(ingredient),
            is_low_stock: self.is_low_stock(ingredient),
            is_out_of_stock: self.is_out_of_stock(ingredient),
            last_import_date: last_import_date(ingredient),
            average_price: average_price(ingredient),
            total_import_value: total_import_value(ingredient),
        }
    }
}
