//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between SDK types and `dynq_core` types.
//! These are testable in isolation without DynamoDB access.

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::{
    AttributeValue, KeySchemaElement, KeyType, ScalarAttributeType,
    TableDescription as SdkTableDescription,
};
use base64::Engine as _;
use dynq_core::{
    IndexDescription, KeyElement, KeyRole, QueryError, ResultItem, ScalarType, StoreError,
    TableDescription, TypedValue,
};
use serde_json::{Number, Value};

use super::Item;

// ============================================================================
// Item conversions
// ============================================================================

/// Flatten a raw item into a generic JSON record.
pub fn item_to_result(item: Item) -> Result<ResultItem, QueryError> {
    item.into_iter()
        .map(|(name, value)| attribute_to_json(value).map(|value| (name, value)))
        .collect()
}

/// Convert one attribute value to JSON.
///
/// Binary values become base64 strings and sets become arrays.
pub fn attribute_to_json(value: AttributeValue) -> Result<Value, QueryError> {
    Ok(match value {
        AttributeValue::S(s) => Value::String(s),
        AttributeValue::N(n) => number_to_json(&n),
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::B(blob) => Value::String(encode_blob(&blob)),
        AttributeValue::Ss(values) => Value::Array(values.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(values) => {
            Value::Array(values.iter().map(|n| number_to_json(n)).collect())
        }
        AttributeValue::Bs(values) => Value::Array(
            values
                .iter()
                .map(|blob| Value::String(encode_blob(blob)))
                .collect(),
        ),
        AttributeValue::L(values) => Value::Array(
            values
                .into_iter()
                .map(attribute_to_json)
                .collect::<Result<Vec<_>, QueryError>>()?,
        ),
        AttributeValue::M(map) => Value::Object(item_to_result(map)?),
        other => {
            return Err(QueryError::Conversion(format!(
                "Unsupported attribute value: {:?}",
                other
            )))
        }
    })
}

/// Numbers become JSON numbers when they fit, strings otherwise.
///
/// Decimals with more digits than an `f64` holds are rounded.
fn number_to_json(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Value::from(u);
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn encode_blob(blob: &Blob) -> String {
    base64::engine::general_purpose::STANDARD.encode(blob.as_ref())
}

// ============================================================================
// Key condition conversions
// ============================================================================

/// Convert a typed placeholder value to an SDK attribute value.
pub fn typed_value_to_attribute(value: TypedValue) -> AttributeValue {
    match value {
        TypedValue::S(s) => AttributeValue::S(s),
        TypedValue::N(n) => AttributeValue::N(n),
        TypedValue::B(bytes) => AttributeValue::B(Blob::new(bytes)),
    }
}

// ============================================================================
// Table description conversions
// ============================================================================

/// Convert an SDK table description to the core's description.
pub fn description_from_sdk(table: &SdkTableDescription) -> Result<TableDescription, StoreError> {
    let attribute_definitions = table
        .attribute_definitions()
        .iter()
        .map(|def| {
            scalar_type_from_sdk(def.attribute_type())
                .map(|scalar| (def.attribute_name().to_string(), scalar))
        })
        .collect::<Result<_, StoreError>>()?;

    let global = table
        .global_secondary_indexes()
        .iter()
        .map(|gsi| (gsi.index_name(), gsi.key_schema()));
    let local = table
        .local_secondary_indexes()
        .iter()
        .map(|lsi| (lsi.index_name(), lsi.key_schema()));
    let indexes = global
        .chain(local)
        .map(|(name, key_schema)| {
            key_schema_from_sdk(key_schema).map(|key_schema| IndexDescription {
                name: name.unwrap_or_default().to_string(),
                key_schema,
            })
        })
        .collect::<Result<_, StoreError>>()?;

    Ok(TableDescription {
        table_name: table.table_name().unwrap_or_default().to_string(),
        key_schema: key_schema_from_sdk(table.key_schema())?,
        attribute_definitions,
        indexes,
    })
}

fn key_schema_from_sdk(elements: &[KeySchemaElement]) -> Result<Vec<KeyElement>, StoreError> {
    elements
        .iter()
        .map(|element| {
            let role = match element.key_type() {
                KeyType::Hash => KeyRole::Hash,
                KeyType::Range => KeyRole::Range,
                other => {
                    return Err(StoreError::Request(format!(
                        "Unsupported key type: {}",
                        other.as_str()
                    )))
                }
            };
            Ok(KeyElement {
                name: element.attribute_name().to_string(),
                role,
            })
        })
        .collect()
}

fn scalar_type_from_sdk(scalar: &ScalarAttributeType) -> Result<ScalarType, StoreError> {
    match scalar {
        ScalarAttributeType::S => Ok(ScalarType::String),
        ScalarAttributeType::B => Ok(ScalarType::Binary),
        ScalarAttributeType::N => Ok(ScalarType::Number),
        other => Err(StoreError::Request(format!(
            "Unsupported attribute type: {}",
            other.as_str()
        ))),
    }
}
