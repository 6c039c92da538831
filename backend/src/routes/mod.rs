//! Route definitions for the Kitchen Stock Tracker

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .route("/auth/login", post(handlers::login))
        // Protected routes - user administration
        .nest("/users", user_routes(state.clone()))
        // Protected routes - products and deliveries
        .nest("/products", product_routes(state.clone()))
        // Protected routes - meals and serving
        .nest("/meals", meal_routes(state.clone()))
        // Protected routes - serving log
        .nest("/servings", serving_routes(state.clone()))
        // Protected routes - portion calculation
        .nest("/portions", portion_routes(state.clone()))
        // Protected routes - reports
        .nest("/reports", report_routes(state.clone()))
        // Protected routes - alerts
        .nest("/alerts", alert_routes(state))
}

/// User administration routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route("/me", get(handlers::get_me))
        .route(
            "/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Product and delivery routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::register_product),
        )
        .route("/deliveries", get(handlers::list_deliveries))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::rename_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/:product_id/deliveries",
            get(handlers::get_product_deliveries).post(handlers::record_delivery),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Meal catalog routes (protected)
fn meal_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_meals).post(handlers::create_meal))
        .route(
            "/:meal_id",
            get(handlers::get_meal)
                .put(handlers::update_meal)
                .delete(handlers::delete_meal),
        )
        .route("/:meal_id/serve", post(handlers::serve_meal))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Serving log routes (protected)
fn serving_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_servings))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Portion calculation routes (protected)
fn portion_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::calculate_portions_for_all))
        .route("/:meal_id", get(handlers::calculate_portions))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Report routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/monthly_summary", get(handlers::monthly_summary))
        .route(
            "/ingredient_consumption",
            get(handlers::ingredient_consumption),
        )
        .route(
            "/delivery_history/:product_id",
            get(handlers::delivery_history),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Alert routes (protected)
fn alert_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/low_stock", get(handlers::low_stock_alerts))
        .route("/potential_abuse", get(handlers::potential_abuse_alert))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
