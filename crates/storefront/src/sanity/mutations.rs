//! Mutation payloads for product documents.

use boutique_core::ProductId;
use boutique_core::catalog::ProductDocument;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value, json};

/// Stored `_type` of product documents.
pub const PRODUCT_TYPE: &str = "product";

/// Document fields for a product, as written to the store.
///
/// Prices are written as JSON numbers, the slug as a slug object, and
/// images (asset ids) as asset references. Array members get a `_key`.
#[must_use]
pub fn product_fields(doc: &ProductDocument) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("title".to_owned(), json!(doc.title));
    fields.insert("price".to_owned(), number(doc.price));
    if let Some(description) = &doc.description {
        fields.insert("description".to_owned(), json!(description));
    }
    if let Some(asset) = &doc.image {
        fields.insert("defaultImage".to_owned(), image_ref(asset));
    }
    fields.insert(
        "slug".to_owned(),
        json!({ "_type": "slug", "current": doc.slug.as_str() }),
    );

    let colors = doc
        .colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let mut entry = json!({
                "_key": format!("color-{i}"),
                "_type": "object",
                "color": color.name,
            });
            if let (Some(asset), Some(obj)) = (&color.image, entry.as_object_mut()) {
                obj.insert("image".to_owned(), image_ref(asset));
            }
            entry
        })
        .collect::<Vec<_>>();
    fields.insert("colorImages".to_owned(), Value::Array(colors));

    let variants = doc
        .variants
        .iter()
        .map(|v| {
            let mut entry = json!({
                "_key": v.sku.as_str(),
                "_type": "object",
                "color": v.color,
                "size": v.size,
                "quantity": v.quantity,
                "sku": v.sku.as_str(),
            });
            if let (Some(price), Some(obj)) = (v.price_override, entry.as_object_mut()) {
                obj.insert("priceOverride".to_owned(), number(price));
            }
            entry
        })
        .collect::<Vec<_>>();
    fields.insert("variants".to_owned(), Value::Array(variants));

    fields
}

/// `create` mutation for a new product.
#[must_use]
pub fn create(doc: &ProductDocument) -> Value {
    let mut fields = product_fields(doc);
    fields.insert("_type".to_owned(), json!(PRODUCT_TYPE));
    json!({ "mutations": [{ "create": fields }] })
}

/// `patch`/`set` mutation replacing a product's fields.
#[must_use]
pub fn replace(id: &ProductId, doc: &ProductDocument) -> Value {
    json!({ "mutations": [{ "patch": { "id": id.as_str(), "set": product_fields(doc) } }] })
}

/// `delete` mutation.
#[must_use]
pub fn delete(id: &ProductId) -> Value {
    json!({ "mutations": [{ "delete": { "id": id.as_str() } }] })
}

fn image_ref(asset: &str) -> Value {
    json!({ "_type": "image", "asset": { "_type": "reference", "_ref": asset } })
}

fn number(value: Decimal) -> Value {
    value
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map_or(Value::Null, Value::Number)
}
