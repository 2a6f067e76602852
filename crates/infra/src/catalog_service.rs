//! Product catalog orchestration (list / create / bulk delete).
//!
//! ```text
//! create(payload)
//!   ↓
//! 1. Compose schema for the declared kind and validate (all violations collected)
//!   ↓
//! 2. Fast-path sku uniqueness check against the store
//!   ↓
//! 3. Build the product and insert (store constraint is the final duplicate guard)
//! ```
//!
//! This module contains no IO itself; it composes the `ProductStore` trait.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use catalog_core::{DomainError, Entity, ProductId, Violations};
use catalog_products::{Product, SchemaValidator, VariantEntry, VariantRegistry};

use crate::product_store::{ProductStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Deterministic, field-attributable failure (validation, duplicate sku).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Persistence failed.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateSku(sku) => CatalogError::Domain(DomainError::duplicate_sku(sku)),
            other => CatalogError::Store(other),
        }
    }
}

impl CatalogError {
    /// `field -> message` view for client responses, if the error is field-attributable.
    pub fn violations(&self) -> Option<Violations> {
        match self {
            CatalogError::Domain(e) => e.violations(),
            CatalogError::Store(_) => None,
        }
    }
}

/// Catalog service: the sole owner of product lifetime.
pub struct CatalogService<S> {
    store: S,
    registry: Arc<VariantRegistry>,
}

impl<S> CatalogService<S>
where
    S: ProductStore,
{
    pub fn new(store: S, registry: Arc<VariantRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registered kinds with their field schemas, in registry order.
    pub fn variants(&self) -> &[VariantEntry] {
        self.registry.entries()
    }

    /// Every product, ordered by id ascending.
    #[instrument(skip(self), err)]
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let products = self.store.list().await?;
        debug!(count = products.len(), "listed products");
        Ok(products)
    }

    /// Validate `payload`, enforce sku uniqueness, and persist the product.
    #[instrument(skip(self, payload), err)]
    pub async fn create(&self, payload: &JsonValue) -> Result<Product, CatalogError> {
        let validator = SchemaValidator::new(&self.registry);
        let product = validator.parse(payload).inspect_err(|e| {
            debug!(error = %e, "create payload rejected");
        })?;

        if self.store.find_by_sku(product.sku()).await?.is_some() {
            debug!(sku = product.sku(), "duplicate sku rejected before insert");
            return Err(DomainError::duplicate_sku(product.sku()).into());
        }

        let stored = self.store.insert(product).await.inspect_err(|e| {
            if let StoreError::DuplicateSku(_) = e {
                warn!(error = %e, "duplicate sku caught by store constraint");
            }
        })?;

        info!(
            id = %stored.id(),
            sku = stored.sku(),
            product_type = stored.type_name(),
            "product created"
        );
        Ok(stored)
    }

    /// Delete every id in `ids` that exists; absent ids are ignored.
    ///
    /// An empty set performs no store call.
    #[instrument(skip(self), fields(requested = ids.len()), err)]
    pub async fn delete_many(&self, ids: &BTreeSet<ProductId>) -> Result<Vec<ProductId>, CatalogError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<ProductId> = ids.iter().copied().collect();
        let removed = self.store.delete_many(&ids).await?;
        info!(removed = removed.len(), "products deleted");
        Ok(removed)
    }
}
