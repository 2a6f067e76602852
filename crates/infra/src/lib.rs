//! Infrastructure layer: product persistence, the catalog service, and config.

pub mod catalog_service;
pub mod config;
pub mod product_store;

pub use catalog_service::{CatalogError, CatalogService};
pub use config::{AppConfig, ConfigError, StoreConfig};
pub use product_store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
