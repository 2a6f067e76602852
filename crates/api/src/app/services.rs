//! Infrastructure wiring: picks the product store and builds the catalog.

use std::sync::Arc;

use catalog_infra::{
    CatalogService, InMemoryProductStore, PostgresProductStore, ProductStore, StoreConfig, StoreError,
};
use catalog_products::VariantRegistry;

/// Catalog handle shared by every handler.
pub type SharedCatalog = Arc<CatalogService<Arc<dyn ProductStore>>>;

pub async fn build_services(store: &StoreConfig) -> Result<SharedCatalog, StoreError> {
    match store {
        StoreConfig::InMemory => Ok(build_in_memory_services()),
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => build_persistent_services(database_url, *max_connections).await,
    }
}

/// In-memory wiring (dev/test).
pub fn build_in_memory_services() -> SharedCatalog {
    tracing::info!("using in-memory product store");
    catalog(Arc::new(InMemoryProductStore::new()))
}

async fn build_persistent_services(
    database_url: &str,
    max_connections: u32,
) -> Result<SharedCatalog, StoreError> {
    let store = PostgresProductStore::connect(database_url, max_connections).await?;
    store.ensure_schema().await?;
    tracing::info!(max_connections, "using postgres product store");
    Ok(catalog(Arc::new(store)))
}

fn catalog(store: Arc<dyn ProductStore>) -> SharedCatalog {
    Arc::new(CatalogService::new(store, Arc::new(VariantRegistry::standard())))
}
