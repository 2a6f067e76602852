use axum::{routing::get, Router};

pub mod products;
pub mod system;

/// Router for every catalog endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(products::router())
}
