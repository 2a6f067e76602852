//! Creation-payload validation.
//!
//! The schema for a create request is composed per payload: the common fields,
//! plus the declared kind's fields when (and only when) `productType` names a
//! registered kind. An unrecognised `productType` fails on its own enum check and
//! the kind-specific fields are left unchecked.

use serde_json::{Map as JsonMap, Value as JsonValue};

use catalog_core::{DomainError, DomainResult, Violations};

use crate::product::{NewProduct, common_fields_schema};
use crate::registry::VariantRegistry;
use crate::schema::{FieldConstraint, Schema};

/// Payload key naming the product kind.
pub const PRODUCT_TYPE_FIELD: &str = "productType";

/// Validates create payloads against a registry.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'r> {
    registry: &'r VariantRegistry,
}

impl<'r> SchemaValidator<'r> {
    pub fn new(registry: &'r VariantRegistry) -> Self {
        Self { registry }
    }

    /// Common schema: `sku`, `name`, `price`, and `productType` restricted to
    /// the registry's display names.
    pub fn common_schema(&self) -> Schema {
        common_fields_schema().required(
            PRODUCT_TYPE_FIELD,
            FieldConstraint::string().one_of(self.registry.display_names()),
        )
    }

    /// Full schema for a payload declaring `declared` as its kind.
    pub fn compose(&self, declared: Option<&str>) -> Schema {
        let common = self.common_schema();
        let variant_schema = declared
            .and_then(|name| self.registry.lookup(name))
            .and_then(|variant| self.registry.schema_for(variant).ok());

        match variant_schema {
            Some(schema) => common.merge(schema),
            None => common,
        }
    }

    /// Validate a raw payload; the result is empty when the payload is acceptable.
    pub fn validate(&self, payload: &JsonValue) -> Violations {
        let declared = payload.get(PRODUCT_TYPE_FIELD).and_then(JsonValue::as_str);
        self.compose(declared).validate(payload)
    }

    /// Validate and, on success, build the unsaved product.
    pub fn parse(&self, payload: &JsonValue) -> DomainResult<NewProduct> {
        self.validate(payload)
            .into_result()
            .map_err(DomainError::validation)?;

        let obj = payload
            .as_object()
            .ok_or_else(|| DomainError::field("payload", "Object value found, but an object is required"))?;

        let type_name = str_field(obj, PRODUCT_TYPE_FIELD)?;
        let variant = self
            .registry
            .lookup(type_name)
            .ok_or_else(|| DomainError::unknown_variant(type_name))?;
        let price = obj
            .get("price")
            .and_then(JsonValue::as_f64)
            .ok_or_else(|| DomainError::field("price", "The property price is required"))?;

        NewProduct::create(
            str_field(obj, "sku")?,
            str_field(obj, "name")?,
            price,
            variant,
            obj,
        )
    }
}

fn str_field<'a>(obj: &'a JsonMap<String, JsonValue>, name: &str) -> DomainResult<&'a str> {
    obj.get(name)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| DomainError::field(name, format!("The property {name} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::DvdAttributes;
    use crate::variant::ProductVariant;
    use serde_json::json;

    fn registry() -> VariantRegistry {
        VariantRegistry::standard()
    }

    #[test]
    fn valid_dvd_payload_parses() {
        let reg = registry();
        let p = SchemaValidator::new(&reg)
            .parse(&json!({
                "sku": "D1",
                "name": "Movie",
                "price": 9.99,
                "productType": "DVD",
                "size": 700,
            }))
            .unwrap();
        assert_eq!(p.variant(), ProductVariant::Dvd);
        assert_eq!(p.price(), 9.99);
    }

    #[test]
    fn compose_merges_declared_kind_fields() {
        let reg = registry();
        let v = SchemaValidator::new(&reg);
        let schema = v.compose(Some("Furniture"));
        for f in ["sku", "name", "price", "productType", "height", "width", "length"] {
            assert!(schema.is_required(f), "{f} should be required");
        }
        assert!(v.compose(Some("Lamp")).get("height").is_none());
        assert!(v.compose(None).get("size").is_none());
    }

    #[test]
    fn product_type_enum_follows_registry() {
        let reg = VariantRegistry::new().register::<DvdAttributes>();
        let v = SchemaValidator::new(&reg).validate(&json!({
            "sku": "B1",
            "name": "Book",
            "price": 1,
            "productType": "Book",
            "weight": 1,
        }));
        assert_eq!(
            v.get("productType"),
            Some("Does not have a value in the enumeration [\"DVD\"]")
        );
    }

    #[test]
    fn collects_every_violation() {
        let reg = registry();
        let v = SchemaValidator::new(&reg).validate(&json!({
            "sku": "",
            "price": -1,
            "productType": "Book",
            "weight": 0,
        }));
        assert_eq!(v.fields().collect::<Vec<_>>(), vec!["name", "price", "sku", "weight"]);
        assert_eq!(v.get("name"), Some("The property name is required"));
    }

    #[test]
    fn unknown_kind_skips_kind_fields() {
        let reg = registry();
        let v = SchemaValidator::new(&reg).validate(&json!({
            "sku": "X1",
            "name": "Thing",
            "price": 1,
            "productType": "Lamp",
            "size": "huge",
            "weight": -4,
        }));
        assert_eq!(v.len(), 1);
        assert!(v.contains("productType"));
    }

    #[test]
    fn missing_kind_reports_product_type_only() {
        let reg = registry();
        let v = SchemaValidator::new(&reg).validate(&json!({
            "sku": "X1",
            "name": "Thing",
            "price": 1,
        }));
        assert_eq!(v.get("productType"), Some("The property productType is required"));
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn dvd_size_must_be_integer() {
        let reg = registry();
        let err = SchemaValidator::new(&reg)
            .parse(&json!({
                "sku": "D1",
                "name": "Movie",
                "price": 1,
                "productType": "DVD",
                "size": 1.5,
            }))
            .unwrap_err();
        match err {
            DomainError::Validation(v) => {
                assert_eq!(v.get("size"), Some("Number value found, but an integer is required"))
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn non_object_payload_fails_validation() {
        let reg = registry();
        let err = SchemaValidator::new(&reg).parse(&json!("DVD")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(v) if v.contains("payload")));
    }
}
