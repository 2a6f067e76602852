//! Product persistence boundary.
//!
//! `ProductStore` is the only collaborator the catalog service talks to for
//! storage. The in-memory implementation backs tests and local runs; the
//! Postgres implementation keeps every kind in one discriminated table.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError};
