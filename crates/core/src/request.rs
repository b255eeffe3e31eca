//! Query request builder.
//!
//! Combines the partition-key equality with an optional parsed sort
//! condition into a [`KeyCondition`] whose placeholder values are typed from
//! the table schema.

use std::collections::BTreeMap;

use crate::error::{QueryError, Result};
use crate::expression::{parse_sort_expr, SortCondition};
use crate::schema::{ScalarType, TableSchema};

pub const PARTITION_NAME: &str = "#pk";
pub const PARTITION_VALUE: &str = ":pk";
pub const SORT_NAME: &str = "#sk";
pub const SORT_VALUE: &str = ":sk";
pub const SORT_UPPER_VALUE: &str = ":sk2";

/// A placeholder value tagged with the attribute's declared scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    S(String),
    B(Vec<u8>),
    N(String),
}

impl TypedValue {
    /// Tags raw text with the given scalar type. Numbers stay textual.
    pub fn new(scalar: ScalarType, raw: &str) -> Self {
        match scalar {
            ScalarType::String => TypedValue::S(raw.to_string()),
            ScalarType::Binary => TypedValue::B(raw.as_bytes().to_vec()),
            ScalarType::Number => TypedValue::N(raw.to_string()),
        }
    }
}

/// A fully typed key condition, ready for the store's query call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCondition {
    pub table_name: String,
    pub index_name: Option<String>,
    pub expression: String,
    /// Placeholder name to real attribute name.
    pub names: BTreeMap<String, String>,
    /// Placeholder value to typed value.
    pub values: BTreeMap<String, TypedValue>,
}

/// Builds the key condition for `partition_value` and an optional sort expression.
pub fn build_key_condition(
    schema: &TableSchema,
    partition_value: &str,
    sort_expr: Option<&str>,
) -> Result<KeyCondition> {
    let mut names = BTreeMap::new();
    let mut values = BTreeMap::new();

    let partition_type = schema.attribute_type(&schema.partition_key)?;
    names.insert(PARTITION_NAME.to_string(), schema.partition_key.clone());
    values.insert(
        PARTITION_VALUE.to_string(),
        TypedValue::new(partition_type, partition_value),
    );

    let mut expression = format!("{} = {}", PARTITION_NAME, PARTITION_VALUE);

    if let Some(raw) = sort_expr {
        let sort_key = schema
            .sort_key
            .as_deref()
            .ok_or_else(|| QueryError::MissingSortKey {
                table: schema.table_name.clone(),
            })?;
        let sort_type = schema.attribute_type(sort_key)?;
        names.insert(SORT_NAME.to_string(), sort_key.to_string());

        let condition = parse_sort_expr(raw);
        expression.push_str(" AND ");
        expression.push_str(&sort_clause(&condition));

        for (placeholder, operand) in sort_operands(&condition) {
            values.insert(placeholder.to_string(), TypedValue::new(sort_type, operand));
        }
    }

    Ok(KeyCondition {
        table_name: schema.table_name.clone(),
        index_name: schema.index_name.clone(),
        expression,
        names,
        values,
    })
}

fn sort_clause(condition: &SortCondition) -> String {
    match condition {
        SortCondition::Eq(_) => format!("{} = {}", SORT_NAME, SORT_VALUE),
        SortCondition::Lt(_) => format!("{} < {}", SORT_NAME, SORT_VALUE),
        SortCondition::Le(_) => format!("{} <= {}", SORT_NAME, SORT_VALUE),
        SortCondition::Gt(_) => format!("{} > {}", SORT_NAME, SORT_VALUE),
        SortCondition::Ge(_) => format!("{} >= {}", SORT_NAME, SORT_VALUE),
        SortCondition::Between(_, _) => format!(
            "{} BETWEEN {} AND {}",
            SORT_NAME, SORT_VALUE, SORT_UPPER_VALUE
        ),
        SortCondition::BeginsWith(_) => format!("begins_with({}, {})", SORT_NAME, SORT_VALUE),
    }
}

fn sort_operands(condition: &SortCondition) -> Vec<(&'static str, &str)> {
    match condition {
        SortCondition::Eq(v)
        | SortCondition::Lt(v)
        | SortCondition::Le(v)
        | SortCondition::Gt(v)
        | SortCondition::Ge(v)
        | SortCondition::BeginsWith(v) => vec![(SORT_VALUE, v.as_str())],
        SortCondition::Between(low, high) => vec![
            (SORT_VALUE, low.as_str()),
            (SORT_UPPER_VALUE, high.as_str()),
        ],
    }
}
