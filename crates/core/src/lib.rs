//! `catalog-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;
pub mod violations;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, DUPLICATE_SKU_MESSAGE};
pub use id::ProductId;
pub use value_object::ValueObject;
pub use violations::Violations;
