use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::ProductId;
use catalog_products::{NewProduct, Product};

/// Product store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors (validation).
/// `DuplicateSku` is the exception: the store's own uniqueness constraint is the
/// authoritative guard when two creates race past the service's pre-check.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sku already exists: {0}")]
    DuplicateSku(String),

    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("stored product {id} is corrupt: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Persistence collaborator for products.
///
/// Implementations must:
/// - assign ids on `insert`, strictly increasing, never reused
/// - return `list` ordered by id ascending
/// - reject an `insert` whose sku is already stored (exact, case-sensitive match)
/// - make `delete_many` ignore ids that are not stored and report only removed ones
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every stored product, ordered by id ascending.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Exact-match lookup by sku.
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError>;

    /// Persist a new product and return it with its assigned id.
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Remove the given ids; returns the ids actually removed, ascending.
    async fn delete_many(&self, ids: &[ProductId]) -> Result<Vec<ProductId>, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list().await
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        (**self).find_by_sku(sku).await
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).insert(product).await
    }

    async fn delete_many(&self, ids: &[ProductId]) -> Result<Vec<ProductId>, StoreError> {
        (**self).delete_many(ids).await
    }
}
