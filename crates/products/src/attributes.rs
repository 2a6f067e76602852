//! Variant-specific attribute sets.
//!
//! Every product kind owns exactly one attribute struct. The structs implement
//! `VariantAttributes`, which is the whole capability set a kind has to provide:
//! its field schema, how to populate itself from payload fields, and how to
//! describe itself to clients. Adding a kind means adding a struct here, a case
//! to `Attributes` and `ProductVariant`, and one `register` call in the registry.

use serde_json::{Map as JsonMap, Value as JsonValue, json};

use catalog_core::{DomainError, DomainResult, ValueObject};

use crate::schema::{FieldConstraint, Schema};
use crate::variant::ProductVariant;

/// Capability set every product kind implements.
pub trait VariantAttributes: ValueObject + Sized {
    /// Kind this attribute set belongs to.
    const VARIANT: ProductVariant;

    /// Constraints on the kind-specific payload fields.
    fn field_schema() -> Schema;

    /// Build the attribute set from payload fields, enforcing `field_schema`.
    fn from_fields(fields: &JsonMap<String, JsonValue>) -> DomainResult<Self>;

    /// Kind-specific description (never includes common fields).
    fn describe(&self) -> JsonMap<String, JsonValue>;

    fn type_name() -> &'static str {
        Self::VARIANT.display_name()
    }
}

fn positive_float() -> FieldConstraint {
    FieldConstraint::number()
        .minimum(0.0)
        .exclusive_minimum()
        .maximum(f64::MAX)
}

fn checked_fields<A: VariantAttributes>(fields: &JsonMap<String, JsonValue>) -> DomainResult<()> {
    A::field_schema()
        .validate_map(fields)
        .into_result()
        .map_err(DomainError::validation)
}

fn float_field(fields: &JsonMap<String, JsonValue>, name: &str) -> DomainResult<f64> {
    fields
        .get(name)
        .and_then(JsonValue::as_f64)
        .ok_or_else(|| DomainError::field(name, format!("The property {name} is required")))
}

fn into_map(value: JsonValue) -> JsonMap<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => JsonMap::new(),
    }
}

/// DVD: disc capacity in megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DvdAttributes {
    pub size: i32,
}

impl ValueObject for DvdAttributes {}

impl VariantAttributes for DvdAttributes {
    const VARIANT: ProductVariant = ProductVariant::Dvd;

    fn field_schema() -> Schema {
        Schema::new().required(
            "size",
            FieldConstraint::integer()
                .minimum(1.0)
                .maximum(f64::from(i32::MAX)),
        )
    }

    fn from_fields(fields: &JsonMap<String, JsonValue>) -> DomainResult<Self> {
        checked_fields::<Self>(fields)?;
        let size = fields
            .get("size")
            .and_then(JsonValue::as_i64)
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| DomainError::field("size", "Must have a maximum value of 2147483647"))?;
        Ok(Self { size })
    }

    fn describe(&self) -> JsonMap<String, JsonValue> {
        into_map(json!({ "size": self.size, "unit": "MB" }))
    }
}

/// Book: weight in kilograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookAttributes {
    pub weight: f64,
}

impl ValueObject for BookAttributes {}

impl VariantAttributes for BookAttributes {
    const VARIANT: ProductVariant = ProductVariant::Book;

    fn field_schema() -> Schema {
        Schema::new().required("weight", positive_float())
    }

    fn from_fields(fields: &JsonMap<String, JsonValue>) -> DomainResult<Self> {
        checked_fields::<Self>(fields)?;
        Ok(Self {
            weight: float_field(fields, "weight")?,
        })
    }

    fn describe(&self) -> JsonMap<String, JsonValue> {
        into_map(json!({ "weight": self.weight, "unit": "kg" }))
    }
}

/// Furniture: outer dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FurnitureAttributes {
    pub height: f64,
    pub width: f64,
    pub length: f64,
}

impl ValueObject for FurnitureAttributes {}

impl VariantAttributes for FurnitureAttributes {
    const VARIANT: ProductVariant = ProductVariant::Furniture;

    fn field_schema() -> Schema {
        Schema::new()
            .required("height", positive_float())
            .required("width", positive_float())
            .required("length", positive_float())
    }

    fn from_fields(fields: &JsonMap<String, JsonValue>) -> DomainResult<Self> {
        checked_fields::<Self>(fields)?;
        Ok(Self {
            height: float_field(fields, "height")?,
            width: float_field(fields, "width")?,
            length: float_field(fields, "length")?,
        })
    }

    fn describe(&self) -> JsonMap<String, JsonValue> {
        into_map(json!({
            "height": self.height,
            "width": self.width,
            "length": self.length,
        }))
    }
}

/// The one attribute set a product carries, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Attributes {
    Dvd(DvdAttributes),
    Book(BookAttributes),
    Furniture(FurnitureAttributes),
}

impl ValueObject for Attributes {}

impl Attributes {
    /// Populate the attribute set for `variant` from payload fields.
    pub fn from_fields(
        variant: ProductVariant,
        fields: &JsonMap<String, JsonValue>,
    ) -> DomainResult<Self> {
        Ok(match variant {
            ProductVariant::Dvd => Self::Dvd(DvdAttributes::from_fields(fields)?),
            ProductVariant::Book => Self::Book(BookAttributes::from_fields(fields)?),
            ProductVariant::Furniture => {
                Self::Furniture(FurnitureAttributes::from_fields(fields)?)
            }
        })
    }

    /// Field schema of a kind, without constructing anything.
    pub fn schema_of(variant: ProductVariant) -> Schema {
        match variant {
            ProductVariant::Dvd => DvdAttributes::field_schema(),
            ProductVariant::Book => BookAttributes::field_schema(),
            ProductVariant::Furniture => FurnitureAttributes::field_schema(),
        }
    }

    pub fn variant(&self) -> ProductVariant {
        match self {
            Self::Dvd(_) => DvdAttributes::VARIANT,
            Self::Book(_) => BookAttributes::VARIANT,
            Self::Furniture(_) => FurnitureAttributes::VARIANT,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.variant().display_name()
    }

    pub fn describe(&self) -> JsonMap<String, JsonValue> {
        match self {
            Self::Dvd(a) => a.describe(),
            Self::Book(a) => a.describe(),
            Self::Furniture(a) => a.describe(),
        }
    }
}

impl From<DvdAttributes> for Attributes {
    fn from(value: DvdAttributes) -> Self {
        Self::Dvd(value)
    }
}

impl From<BookAttributes> for Attributes {
    fn from(value: BookAttributes) -> Self {
        Self::Book(value)
    }
}

impl From<FurnitureAttributes> for Attributes {
    fn from(value: FurnitureAttributes) -> Self {
        Self::Furniture(value)
    }
}
