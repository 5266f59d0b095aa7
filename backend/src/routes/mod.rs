//! Route definitions for the Bakehouse Admin Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Payment gateway webhook (public - signature verified)
        .route("/webhook/payment", post(handlers::handle_payment_webhook))
        // Protected routes - ingredient/stock management
        .nest("/ingredients", ingredient_routes())
        // Protected routes - recipe management
        .nest("/recipes", recipe_routes())
        // Protected routes - supplier management
        .nest("/suppliers", supplier_routes())
        // Protected routes - order management
        .nest("/orders", order_routes())
        // Protected routes - CSV export
        .nest("/export", export_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Ingredient management routes (protected)
fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_ingredients).post(handlers::create_ingredient),
        )
        .route("/low-stock", get(handlers::list_low_stock))
        .route(
            "/:ingredient_id",
            get(handlers::get_ingredient)
                .put(handlers::update_ingredient)
                .delete(handlers::delete_ingredient),
        )
        .route(
            "/:ingredient_id/imports",
            get(handlers::get_import_history).post(handlers::record_import),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Recipe management routes (protected)
fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route(
            "/:recipe_id",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route(
            "/:recipe_id/requirements",
            get(handlers::get_recipe_requirements),
        )
        .route(
            "/:recipe_id/max-production",
            get(handlers::get_max_production),
        )
        .route("/:recipe_id/batches-for", get(handlers::get_batches_for))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Supplier management routes (protected)
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::deactivate_supplier),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Order management routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/status", put(handlers::update_order_status))
        .route("/:order_id/cancel", post(handlers::cancel_order))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// CSV export routes (protected)
fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(handlers::export_ingredients_csv))
        .route("/orders", get(handlers::export_orders_csv))
        .route_layer(middleware::from_fn(auth_middleware))
}
