mod categories;
mod categories_v2;
mod companies;
mod health;
mod products;
mod roles;
mod users;

use axum::{routing::get, Router};

use crate::app::AppState;

pub fn create_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api/v1/catalog/categories", categories::router(state))
        .nest("/api/v1/catalog/products", products::router(state))
        .nest("/api/v1/catalog/companies", companies::router(state))
        .nest("/api/v1/catalog/roles", roles::router(state))
        .nest("/api/v1/users", users::router(state))
        .nest("/api/v2/categories", categories_v2::router(state))
}
