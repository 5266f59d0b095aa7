//! HTTP handlers
//!
//! Handlers stay thin: extract, delegate to a service, wrap the response.

mod auth;
mod export;
mod health;
mod ingredient;
mod order;
mod payment_webhook;
mod recipe;
mod supplier;

pub use auth::{login, refresh, register};
pub use export::{export_ingredients_csv, export_orders_csv};
pub use health::health_check;
pub use ingredient::{
    create_ingredient, delete_ingredient, get_import_history, get_ingredient, list_ingredients,
    list_low_stock, record_import, update_ingredient,
};
pub use order::{cancel_order, create_order, get_order, list_orders, update_order_status};
pub use payment_webhook::handle_payment_webhook;
pub use recipe::{
    create_recipe, delete_recipe, get_batches_for, get_max_production, get_recipe,
    get_recipe_requirements, list_recipes, update_recipe,
};
pub use supplier::{
    create_supplier, deactivate_supplier, get_supplier, list_suppliers, update_supplier,
};
