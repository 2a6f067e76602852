//! VariantRegistry: the single place that maps product kinds to their metadata.

use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use catalog_core::{DomainError, DomainResult};

use crate::attributes::{BookAttributes, DvdAttributes, FurnitureAttributes, VariantAttributes};
use crate::product::Product;
use crate::schema::Schema;
use crate::variant::ProductVariant;

/// Metadata registered for one product kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantEntry {
    #[serde(skip)]
    variant: ProductVariant,
    name: &'static str,
    fields: Schema,
}

impl VariantEntry {
    pub fn variant(&self) -> ProductVariant {
        self.variant
    }

    pub fn display_name(&self) -> &'static str {
        self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.fields
    }
}

/// Immutable kind registry, built once at startup and shared by reference.
///
/// Registration order is the listing order used for validation enums and UI
/// dropdowns.
#[derive(Debug, Clone, Default)]
pub struct VariantRegistry {
    entries: Vec<VariantEntry>,
}

impl VariantRegistry {
    /// An empty registry; use `register` to add kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind (DVD, Book, Furniture).
    pub fn standard() -> Self {
        Self::new()
            .register::<DvdAttributes>()
            .register::<BookAttributes>()
            .register::<FurnitureAttributes>()
    }

    /// Register a kind by its attribute set. Re-registering replaces the entry in place.
    pub fn register<A: VariantAttributes>(mut self) -> Self {
        let entry = VariantEntry {
            variant: A::VARIANT,
            name: A::type_name(),
            fields: A::field_schema(),
        };
        match self.entries.iter_mut().find(|e| e.variant == A::VARIANT) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    pub fn entries(&self) -> &[VariantEntry] {
        &self.entries
    }

    /// `(display name, kind)` pairs in registration order.
    pub fn list_variants(&self) -> Vec<(&'static str, ProductVariant)> {
        self.entries.iter().map(|e| (e.name, e.variant)).collect()
    }

    pub fn display_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    /// Resolve a `productType` value; only registered kinds resolve.
    pub fn lookup(&self, display_name: &str) -> Option<ProductVariant> {
        self.entries
            .iter()
            .find(|e| e.name == display_name)
            .map(|e| e.variant)
    }

    pub fn is_registered(&self, variant: ProductVariant) -> bool {
        self.entries.iter().any(|e| e.variant == variant)
    }

    /// Field schema of a registered kind.
    pub fn schema_for(&self, variant: ProductVariant) -> DomainResult<&Schema> {
        self.entries
            .iter()
            .find(|e| e.variant == variant)
            .map(|e| &e.fields)
            .ok_or_else(|| DomainError::unknown_variant(variant.display_name()))
    }

    /// Kind-specific description of a product.
    pub fn describe(&self, product: &Product) -> JsonMap<String, JsonValue> {
        product.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use catalog_core::ProductId;
    use serde_json::json;

    #[test]
    fn standard_registry_lists_kinds_in_stable_order() {
        let reg = VariantRegistry::standard();
        assert_eq!(
            reg.list_variants(),
            vec![
                ("DVD", ProductVariant::Dvd),
                ("Book", ProductVariant::Book),
                ("Furniture", ProductVariant::Furniture),
            ]
        );
        assert_eq!(reg.list_variants(), VariantRegistry::standard().list_variants());
    }

    #[test]
    fn schema_for_returns_kind_fields() {
        let reg = VariantRegistry::standard();
        let names: Vec<_> = reg
            .schema_for(ProductVariant::Furniture)
            .unwrap()
            .field_names()
            .collect();
        assert_eq!(names, vec!["height", "width", "length"]);
    }

    #[test]
    fn schema_for_unregistered_kind_fails() {
        let reg = VariantRegistry::new().register::<DvdAttributes>();
        assert!(matches!(
            reg.schema_for(ProductVariant::Book),
            Err(DomainError::UnknownVariant(_))
        ));
        assert_eq!(reg.lookup("Book"), None);
        assert_eq!(reg.lookup("DVD"), Some(ProductVariant::Dvd));
    }

    #[test]
    fn re_registering_keeps_one_entry() {
        let reg = VariantRegistry::standard().register::<BookAttributes>();
        assert_eq!(reg.entries().len(), 3);
        assert_eq!(reg.display_names(), vec!["DVD", "Book", "Furniture"]);
    }

    #[test]
    fn describe_dispatches_on_product_kind() {
        let reg = VariantRegistry::standard();
        let p = Product::restore(
            ProductId::new(1),
            "D1",
            "Movie",
            9.99,
            Attributes::Dvd(DvdAttributes { size: 700 }),
        );
        assert_eq!(
            JsonValue::Object(reg.describe(&p)),
            json!({ "size": 700, "unit": "MB" })
        );
    }

    #[test]
    fn entries_serialize_with_name_and_fields() {
        let reg = VariantRegistry::standard();
        let json = serde_json::to_value(&reg.entries()[0]).unwrap();
        assert_eq!(json["name"], "DVD");
        assert_eq!(json["fields"]["properties"]["size"]["type"], "integer");
        assert_eq!(json["fields"]["properties"]["size"]["maximum"], 2147483647.0);
    }
}
