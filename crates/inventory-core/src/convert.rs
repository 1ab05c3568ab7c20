//! Conversion between product values and DynamoDB attribute values.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;

use inventory_model::{FieldValue, Fields, KEY_ATTRIBUTE, Product};

use crate::store::StoreError;

/// Convert a field value into its attribute-value form.
#[must_use]
pub fn to_attribute_value(value: &FieldValue) -> AttributeValue {
    match value {
        FieldValue::Null => AttributeValue::Null(true),
        FieldValue::Bool(b) => AttributeValue::Bool(*b),
        FieldValue::Number(n) => AttributeValue::N(n.to_string()),
        FieldValue::String(s) => AttributeValue::S(s.clone()),
        FieldValue::List(items) => AttributeValue::L(items.iter().map(to_attribute_value).collect()),
        FieldValue::Map(fields) => AttributeValue::M(to_item(fields)),
    }
}

/// Convert a field map into a DynamoDB item.
#[must_use]
pub fn to_item(fields: &Fields) -> HashMap<String, AttributeValue> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), to_attribute_value(v)))
        .collect()
}

/// Convert an attribute value read from the store into a field value.
///
/// String and number sets become lists; binary values become base64 strings.
pub fn from_attribute_value(value: &AttributeValue) -> Result<FieldValue, StoreError> {
    let converted = match value {
        AttributeValue::Null(_) => FieldValue::Null,
        AttributeValue::Bool(b) => FieldValue::Bool(*b),
        AttributeValue::N(n) => FieldValue::Number(parse_number(n)?),
        AttributeValue::S(s) => FieldValue::String(s.clone()),
        AttributeValue::L(items) => FieldValue::List(
            items
                .iter()
                .map(from_attribute_value)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => FieldValue::Map(from_map(map)?),
        AttributeValue::Ss(set) => {
            FieldValue::List(set.iter().cloned().map(FieldValue::String).collect())
        }
        AttributeValue::Ns(set) => FieldValue::List(
            set.iter()
                .map(|n| parse_number(n).map(FieldValue::Number))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::B(blob) => FieldValue::String(encode_blob(blob)),
        AttributeValue::Bs(set) => {
            FieldValue::List(set.iter().map(|b| FieldValue::String(encode_blob(b))).collect())
        }
        other => {
            return Err(StoreError::InvalidItem(format!(
                "unsupported attribute value: {other:?}"
            )));
        }
    };
    Ok(converted)
}

/// Convert a DynamoDB item into a product.
///
/// The item map has no order of its own, so `productId` is placed first and
/// the remaining attributes follow in ascending name order.
pub fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Product, StoreError> {
    from_map(item).map(Product::new)
}

fn from_map(map: &HashMap<String, AttributeValue>) -> Result<Fields, StoreError> {
    let mut names: Vec<&String> = map.keys().collect();
    names.sort_by(|a, b| {
        (a.as_str() != KEY_ATTRIBUTE)
            .cmp(&(b.as_str() != KEY_ATTRIBUTE))
            .then_with(|| a.cmp(b))
    });

    let mut fields = Fields::with_capacity(names.len());
    for name in names {
        fields.insert(name.clone(), from_attribute_value(&map[name])?);
    }
    Ok(fields)
}

fn parse_number(raw: &str) -> Result<serde_json::Number, StoreError> {
    raw.trim()
        .parse::<serde_json::Number>()
        .map_err(|e| StoreError::InvalidItem(format!("invalid number {raw:?}: {e}")))
}

fn encode_blob(blob: &Blob) -> String {
    BASE64_STANDARD.encode(blob.as_ref())
}
