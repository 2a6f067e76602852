use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use catalog_core::{Entity, ProductId, Violations};
use catalog_products::Product;

// -------------------------
// Request DTOs
// -------------------------

/// Parse a create body; anything that is not JSON is a `payload` violation.
pub fn parse_create_payload(body: &[u8]) -> Result<JsonValue, Violations> {
    serde_json::from_slice(body).map_err(|e| {
        let mut v = Violations::new();
        v.insert("payload", format!("Malformed JSON: {e}"));
        v
    })
}

/// Parse a delete body `{ "<id>": bool, ... }` into the ids marked `true`.
///
/// Keys that are not integers cannot name a product and are skipped, as are
/// non-boolean values.
pub fn parse_delete_request(body: &[u8]) -> Result<BTreeSet<ProductId>, String> {
    let value: JsonValue =
        serde_json::from_slice(body).map_err(|e| format!("malformed JSON: {e}"))?;
    let JsonValue::Object(entries) = value else {
        return Err("expected an object mapping product id to boolean".to_string());
    };

    Ok(entries
        .iter()
        .filter(|(_, flag)| flag.as_bool() == Some(true))
        .filter_map(|(key, _)| key.parse::<ProductId>().ok())
        .collect())
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ProductView<'a> {
    #[serde(rename = "type")]
    pub product_type: &'static str,
    pub sku: &'a str,
    pub name: &'a str,
    pub price: f64,
    pub description: JsonMap<String, JsonValue>,
}

impl<'a> From<&'a Product> for ProductView<'a> {
    fn from(p: &'a Product) -> Self {
        Self {
            product_type: p.type_name(),
            sku: p.sku(),
            name: p.name(),
            price: p.price(),
            description: p.describe(),
        }
    }
}

/// `{ "<id>": ProductView }`, keys in the order the products are given.
pub fn product_listing(products: &[Product]) -> JsonMap<String, JsonValue> {
    products
        .iter()
        .map(|p| {
            let view = serde_json::to_value(ProductView::from(p)).unwrap_or(JsonValue::Null);
            (p.id().to_string(), view)
        })
        .collect()
}
