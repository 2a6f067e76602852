//! Product catalog domain module.
//!
//! This crate contains the product type model and its schema-driven validation,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).
//!
//! - `variant`: the closed set of product kinds
//! - `attributes`: per-kind attribute sets and their field schemas
//! - `schema`: typed, composable field constraints
//! - `product`: the product entity (unsaved and stored forms)
//! - `registry`: kind -> display name / schema mapping built once at startup
//! - `validator`: composes the creation schema for a payload and parses it

pub mod attributes;
pub mod product;
pub mod registry;
pub mod schema;
pub mod validator;
pub mod variant;

pub use attributes::{Attributes, BookAttributes, DvdAttributes, FurnitureAttributes, VariantAttributes};
pub use product::{NewProduct, Product};
pub use registry::{VariantEntry, VariantRegistry};
pub use schema::{FieldConstraint, FieldKind, Schema};
pub use validator::{PRODUCT_TYPE_FIELD, SchemaValidator};
pub use variant::ProductVariant;
