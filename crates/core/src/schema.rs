//! Table schema resolution (Functional Core).
//!
//! A [`TableDescription`] is the raw shape the store hands back from a
//! describe call. [`resolve_schema`] validates it into a [`TableSchema`]
//! holding exactly the key attributes the query builder needs.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{QueryError, Result};
use crate::store::TableCatalog;

/// Scalar attribute types a table may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Binary,
    Number,
}

/// Role of an attribute in a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Partition key.
    Hash,
    /// Sort key.
    Range,
}

/// One element of a key schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyElement {
    pub name: String,
    pub role: KeyRole,
}

impl KeyElement {
    pub fn hash(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: KeyRole::Hash,
        }
    }

    pub fn range(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: KeyRole::Range,
        }
    }
}

/// Key schema of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescription {
    pub name: String,
    pub key_schema: Vec<KeyElement>,
}

/// Raw table description as reported by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDescription {
    pub table_name: String,
    pub key_schema: Vec<KeyElement>,
    pub attribute_definitions: Vec<(String, ScalarType)>,
    pub indexes: Vec<IndexDescription>,
}

/// Key schema of a table (or one of its indexes), resolved once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub index_name: Option<String>,
    pub partition_key: String,
    pub sort_key: Option<String>,
    pub attribute_types: HashMap<String, ScalarType>,
}

impl TableSchema {
    /// Returns the declared scalar type of an attribute.
    pub fn attribute_type(&self, name: &str) -> Result<ScalarType> {
        self.attribute_types
            .get(name)
            .copied()
            .ok_or_else(|| QueryError::UnknownAttribute {
                name: name.to_string(),
            })
    }

    /// Validates a raw description into a schema for the table or one of its indexes.
    pub fn from_description(description: TableDescription, index: Option<&str>) -> Result<Self> {
        let table_name = description.table_name;
        let invalid = |message: String| QueryError::SchemaResolution {
            table: table_name.clone(),
            message,
        };

        let key_schema = match index {
            None => &description.key_schema,
            Some(index_name) => description
                .indexes
                .iter()
                .find(|idx| idx.name == index_name)
                .map(|idx| &idx.key_schema)
                .ok_or_else(|| invalid(format!("Index '{}' not found", index_name)))?,
        };

        let mut partition_key = None;
        let mut sort_key = None;
        for element in key_schema {
            let slot = match element.role {
                KeyRole::Hash => &mut partition_key,
                KeyRole::Range => &mut sort_key,
            };
            if slot.is_some() {
                return Err(invalid(format!(
                    "Key schema declares more than one {:?} key",
                    element.role
                )));
            }
            *slot = Some(element.name.clone());
        }

        let partition_key =
            partition_key.ok_or_else(|| invalid("Key schema has no partition key".to_string()))?;

        Ok(Self {
            index_name: index.map(str::to_string),
            partition_key,
            sort_key,
            attribute_types: description.attribute_definitions.into_iter().collect(),
            table_name,
        })
    }
}

/// Resolves the key schema of `table`, calling the catalog exactly once.
pub async fn resolve_schema<C>(catalog: &C, table: &str, index: Option<&str>) -> Result<TableSchema>
where
    C: TableCatalog + ?Sized,
{
    let description = catalog
        .describe_table(table)
        .await
        .map_err(|e| QueryError::SchemaResolution {
            table: table.to_string(),
            message: e.to_string(),
        })?;

    let schema = TableSchema::from_description(description, index)?;
    debug!(
        table = %schema.table_name,
        index = ?schema.index_name,
        partition_key = %schema.partition_key,
        sort_key = ?schema.sort_key,
        "Resolved table schema"
    );
    Ok(schema)
}
