use serde_json::{Map as JsonMap, Value as JsonValue, json};

use catalog_core::{DomainError, DomainResult, Entity, ProductId};

use crate::attributes::Attributes;
use crate::schema::{FieldConstraint, Schema};
use crate::variant::ProductVariant;

/// Maximum length (in characters) of `sku` and `name`.
pub const MAX_TEXT_LEN: usize = 255;

/// Constraints shared by every product kind (`sku`, `name`, `price`).
pub fn common_fields_schema() -> Schema {
    Schema::new()
        .required("sku", FieldConstraint::string().length(1, MAX_TEXT_LEN))
        .required("name", FieldConstraint::string().length(1, MAX_TEXT_LEN))
        .required(
            "price",
            FieldConstraint::number().minimum(0.0).maximum(f64::MAX),
        )
}

/// A validated product that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    sku: String,
    name: String,
    price: f64,
    attributes: Attributes,
}

impl NewProduct {
    /// Build a product, enforcing both common and kind-specific constraints.
    ///
    /// All violations are reported together in a single `DomainError::Validation`.
    pub fn create(
        sku: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        variant: ProductVariant,
        variant_fields: &JsonMap<String, JsonValue>,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();

        let common = json!({ "sku": sku, "name": name, "price": price });
        let mut violations = common_fields_schema().validate(&common);

        let attributes = match Attributes::from_fields(variant, variant_fields) {
            Ok(a) => Some(a),
            Err(DomainError::Validation(v)) => {
                violations.extend(v);
                None
            }
            Err(other) => return Err(other),
        };

        match (violations.into_result(), attributes) {
            (Ok(()), Some(attributes)) => Ok(Self {
                sku,
                name,
                price,
                attributes,
            }),
            (Err(v), _) => Err(DomainError::validation(v)),
            (Ok(()), None) => Err(DomainError::unknown_variant(variant.display_name())),
        }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn variant(&self) -> ProductVariant {
        self.attributes.variant()
    }

    /// Attach the store-assigned identifier.
    pub fn into_stored(self, id: ProductId) -> Product {
        Product {
            id,
            sku: self.sku,
            name: self.name,
            price: self.price,
            attributes: self.attributes,
        }
    }
}

/// A stored product.
///
/// The kind is fixed by `attributes` and cannot change after creation; there is
/// no update path.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    price: f64,
    attributes: Attributes,
}

impl Product {
    /// Rebuild a product from persisted state.
    ///
    /// No constraints are re-checked; they were enforced when the product was created.
    pub fn restore(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        attributes: Attributes,
    ) -> Self {
        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            price,
            attributes,
        }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn variant(&self) -> ProductVariant {
        self.attributes.variant()
    }

    /// Display name of the product's kind.
    pub fn type_name(&self) -> &'static str {
        self.attributes.type_name()
    }

    /// Kind-specific key/value pairs (e.g. DVD -> `{size, unit: "MB"}`).
    pub fn describe(&self) -> JsonMap<String, JsonValue> {
        self.attributes.describe()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{DvdAttributes, FurnitureAttributes};

    fn fields(value: JsonValue) -> JsonMap<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn violations(err: DomainError) -> catalog_core::Violations {
        match err {
            DomainError::Validation(v) => v,
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_dvd_product() {
        let p = NewProduct::create("D1", "Movie", 9.99, ProductVariant::Dvd, &fields(json!({ "size": 700 })))
            .unwrap();
        assert_eq!(p.sku(), "D1");
        assert_eq!(p.name(), "Movie");
        assert_eq!(p.price(), 9.99);
        assert_eq!(p.variant(), ProductVariant::Dvd);
        assert_eq!(p.attributes(), &Attributes::Dvd(DvdAttributes { size: 700 }));
    }

    #[test]
    fn zero_price_is_allowed_negative_is_not() {
        let f = fields(json!({ "weight": 1 }));
        assert!(NewProduct::create("B1", "Book", 0.0, ProductVariant::Book, &f).is_ok());
        let err = NewProduct::create("B1", "Book", -0.01, ProductVariant::Book, &f).unwrap_err();
        assert_eq!(violations(err).get("price"), Some("Must have a minimum value of 0"));
    }

    #[test]
    fn nan_price_is_rejected() {
        let f = fields(json!({ "weight": 1 }));
        let err = NewProduct::create("B1", "Book", f64::NAN, ProductVariant::Book, &f).unwrap_err();
        assert!(violations(err).contains("price"));
    }

    #[test]
    fn common_and_variant_violations_are_reported_together() {
        let err = NewProduct::create("", "x".repeat(256), 1.0, ProductVariant::Dvd, &fields(json!({ "size": 0 })))
            .unwrap_err();
        let v = violations(err);
        assert_eq!(v.fields().collect::<Vec<_>>(), vec!["name", "size", "sku"]);
        assert_eq!(v.get("name"), Some("Must be at most 255 characters long"));
    }

    #[test]
    fn stored_product_exposes_id_and_description() {
        let stored = NewProduct::create(
            "F1",
            "Table",
            120.0,
            ProductVariant::Furniture,
            &fields(json!({ "height": 1, "width": 2, "length": 3 })),
        )
        .unwrap()
        .into_stored(ProductId::new(5));

        assert_eq!(stored.id(), ProductId::new(5));
        assert_eq!(stored.type_name(), "Furniture");
        assert_eq!(
            JsonValue::Object(stored.describe()),
            json!({ "height": 1.0, "width": 2.0, "length": 3.0 })
        );
    }

    #[test]
    fn restore_does_not_revalidate() {
        let p = Product::restore(
            ProductId::new(1),
            "",
            "legacy",
            -1.0,
            FurnitureAttributes { height: 0.0, width: 0.0, length: 0.0 }.into(),
        );
        assert_eq!(p.price(), -1.0);
        assert_eq!(p.variant(), ProductVariant::Furniture);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: any non-negative price is accepted, any negative one rejected.
            #[test]
            fn price_sign_decides_validity(price in -1.0e9f64..1.0e9f64) {
                let f = fields(json!({ "weight": 1 }));
                let result = NewProduct::create("SKU", "Name", price, ProductVariant::Book, &f);
                prop_assert_eq!(result.is_ok(), price >= 0.0);
            }

            /// Property: DVD sizes are accepted exactly on 1..=i32::MAX.
            #[test]
            fn dvd_size_range(size in -1_000i64..=(i64::from(i32::MAX) + 1_000)) {
                let f = fields(json!({ "size": size }));
                let result = NewProduct::create("SKU", "Name", 1.0, ProductVariant::Dvd, &f);
                prop_assert_eq!(result.is_ok(), (1..=i64::from(i32::MAX)).contains(&size));
            }

            /// Property: every accepted sku/name of 1..=255 chars survives unchanged.
            #[test]
            fn text_fields_are_kept_verbatim(
                sku in "[A-Z0-9-]{1,40}",
                name in "[A-Za-z][A-Za-z0-9 ]{0,99}"
            ) {
                let f = fields(json!({ "height": 1, "width": 1, "length": 1 }));
                let p = NewProduct::create(sku.clone(), name.clone(), 1.0, ProductVariant::Furniture, &f).unwrap();
                prop_assert_eq!(p.sku(), sku.as_str());
                prop_assert_eq!(p.name(), name.as_str());
            }
        }
    }
}
