//! Validated operation inputs.
//!
//! Each input is built from the raw request (query string or decoded JSON body)
//! and rejects missing or mistyped parameters with a validation error before
//! anything reaches the store.

use crate::error::InventoryError;
use crate::value::{FieldValue, Fields, KEY_ATTRIBUTE, Product};

/// Query parameter and body field carrying the product key.
pub const PRODUCT_ID_PARAM: &str = "product_id";
/// Body field naming the attribute to update.
pub const UPDATE_KEY_PARAM: &str = "updateKey";
/// Body field carrying the new attribute value.
pub const UPDATE_VALUE_PARAM: &str = "updateValue";

/// Input for `GET /product`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetProductInput {
    /// Key of the product to fetch.
    pub product_id: String,
}

impl GetProductInput {
    /// Build from the `product_id` query parameter.
    pub fn from_query(product_id: Option<&str>) -> Result<Self, InventoryError> {
        let product_id = product_id
            .ok_or_else(|| missing(PRODUCT_ID_PARAM))
            .and_then(|id| non_empty(PRODUCT_ID_PARAM, id))?;
        Ok(Self { product_id })
    }
}

/// Input for `POST /product`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveProductInput {
    /// The full payload, stored verbatim.
    pub product: Product,
}

impl SaveProductInput {
    /// Build from the decoded body. The payload must carry a string key.
    pub fn from_body(body: Fields) -> Result<Self, InventoryError> {
        let product = Product::new(body);
        match product.get(KEY_ATTRIBUTE) {
            None => return Err(missing(KEY_ATTRIBUTE)),
            Some(FieldValue::String(id)) if id.is_empty() => {
                return Err(InventoryError::validation(format!(
                    "{KEY_ATTRIBUTE} must not be empty"
                )));
            }
            Some(FieldValue::String(_)) => {}
            Some(other) => return Err(wrong_type(KEY_ATTRIBUTE, "string", other)),
        }
        Ok(Self { product })
    }
}

/// Input for `PATCH /product`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyProductInput {
    /// Key of the product to update.
    pub product_id: String,
    /// Attribute to set.
    pub update_key: String,
    /// New attribute value; an explicit JSON `null` is a valid value.
    pub update_value: FieldValue,
}

impl ModifyProductInput {
    /// Build from the decoded body.
    pub fn from_body(mut body: Fields) -> Result<Self, InventoryError> {
        let product_id = required_string(&body, PRODUCT_ID_PARAM)?;
        let update_key = required_string(&body, UPDATE_KEY_PARAM)?;
        if update_key == KEY_ATTRIBUTE {
            return Err(InventoryError::validation(format!(
                "Cannot update attribute {KEY_ATTRIBUTE}: it is the product key"
            )));
        }
        let update_value = body
            .shift_remove(UPDATE_VALUE_PARAM)
            .ok_or_else(|| missing(UPDATE_VALUE_PARAM))?;

        Ok(Self {
            product_id,
            update_key,
            update_value,
        })
    }
}

/// Input for `DELETE /product`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProductInput {
    /// Key of the product to delete.
    pub product_id: String,
}

impl DeleteProductInput {
    /// Build from the decoded body.
    pub fn from_body(body: &Fields) -> Result<Self, InventoryError> {
        Ok(Self {
            product_id: required_string(body, PRODUCT_ID_PARAM)?,
        })
    }
}

fn required_string(body: &Fields, name: &str) -> Result<String, InventoryError> {
    match body.get(name) {
        None => Err(missing(name)),
        Some(FieldValue::String(s)) => non_empty(name, s),
        Some(other) => Err(wrong_type(name, "string", other)),
    }
}

fn non_empty(name: &str, value: &str) -> Result<String, InventoryError> {
    if value.is_empty() {
        Err(InventoryError::validation(format!(
            "{name} must not be empty"
        )))
    } else {
        Ok(value.to_owned())
    }
}

fn missing(name: &str) -> InventoryError {
    InventoryError::validation(format!("Missing required parameter: {name}"))
}

fn wrong_type(name: &str, expected: &str, actual: &FieldValue) -> InventoryError {
    InventoryError::validation(format!(
        "{name} must be a {expected}, got {}",
        actual.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> Fields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_should_require_product_id_query_param() {
        assert!(GetProductInput::from_query(None).is_err());
        assert!(GetProductInput::from_query(Some("")).is_err());
        let input = GetProductInput::from_query(Some("p1")).unwrap();
        assert_eq!(input.product_id, "p1");
    }

    #[test]
    fn test_should_require_string_key_on_save() {
        assert!(SaveProductInput::from_body(body(r#"{"name":"x"}"#)).is_err());
        assert!(SaveProductInput::from_body(body(r#"{"productId":5}"#)).is_err());
        assert!(SaveProductInput::from_body(body(r#"{"productId":""}"#)).is_err());
        let input = SaveProductInput::from_body(body(r#"{"productId":"p1","n":1}"#)).unwrap();
        assert_eq!(input.product.id(), Some("p1"));
        assert_eq!(input.product.len(), 2);
    }

    #[test]
    fn test_should_parse_modify_input() {
        let input = ModifyProductInput::from_body(body(
            r#"{"product_id":"p1","updateKey":"price","updateValue":12.5}"#,
        ))
        .unwrap();
        assert_eq!(input.product_id, "p1");
        assert_eq!(input.update_key, "price");
        assert_eq!(
            input.update_value.as_number().and_then(serde_json::Number::as_f64),
            Some(12.5)
        );
    }

    #[test]
    fn test_should_accept_explicit_null_update_value() {
        let input = ModifyProductInput::from_body(body(
            r#"{"product_id":"p1","updateKey":"note","updateValue":null}"#,
        ))
        .unwrap();
        assert!(input.update_value.is_null());
    }

    #[test]
    fn test_should_reject_incomplete_modify_input() {
        let missing_value =
            ModifyProductInput::from_body(body(r#"{"product_id":"p1","updateKey":"price"}"#));
        assert!(missing_value.unwrap_err().message.contains(UPDATE_VALUE_PARAM));

        let missing_key =
            ModifyProductInput::from_body(body(r#"{"product_id":"p1","updateValue":1}"#));
        assert!(missing_key.unwrap_err().message.contains(UPDATE_KEY_PARAM));

        let numeric_key = ModifyProductInput::from_body(body(
            r#"{"product_id":"p1","updateKey":3,"updateValue":1}"#,
        ));
        assert!(numeric_key.is_err());
    }

    #[test]
    fn test_should_reject_updating_the_key_attribute() {
        let err = ModifyProductInput::from_body(body(
            r#"{"product_id":"p1","updateKey":"productId","updateValue":"p2"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.code, crate::InventoryErrorCode::ValidationException);
    }

    #[test]
    fn test_should_parse_delete_input() {
        assert!(DeleteProductInput::from_body(&body("{}")).is_err());
        let input = DeleteProductInput::from_body(&body(r#"{"product_id":"p1"}"#)).unwrap();
        assert_eq!(input.product_id, "p1");
    }
}
