use axum::{
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors, SharedCatalog};

pub fn router() -> Router {
    Router::new()
        .route("/product", post(create_product).delete(delete_products))
        .route("/product/list", get(list_products))
        .route("/product/types", get(list_product_types))
}

pub async fn list_products(Extension(catalog): Extension<SharedCatalog>) -> axum::response::Response {
    match catalog.list().await {
        Ok(products) => Json(dto::product_listing(&products)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

/// Body is read raw so that malformed JSON and a missing content type are
/// reported like any other validation failure.
pub async fn create_product(
    Extension(catalog): Extension<SharedCatalog>,
    body: Bytes,
) -> axum::response::Response {
    let payload = match dto::parse_create_payload(&body) {
        Ok(p) => p,
        Err(violations) => return errors::violations_response(violations),
    };

    match catalog.create(&payload).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_products(
    Extension(catalog): Extension<SharedCatalog>,
    body: Bytes,
) -> axum::response::Response {
    let ids = match dto::parse_delete_request(&body) {
        Ok(ids) => ids,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", msg),
    };

    match catalog.delete_many(&ids).await {
        Ok(removed) => Json(removed).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn list_product_types(Extension(catalog): Extension<SharedCatalog>) -> impl IntoResponse {
    Json(catalog.variants().to_vec())
}
