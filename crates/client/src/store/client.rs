//! DynamoDB-backed catalog and page sources (Imperative Shell).

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use dynq_core::{KeyCondition, PageSource, StoreError, TableCatalog, TableDescription};
use tracing::debug;

use super::conversions::{description_from_sdk, typed_value_to_attribute};
use super::error::{
    map_describe_table_error, map_list_tables_error, map_query_error, map_scan_error,
};
use super::{Item, ItemStore, ReadOptions};

/// DynamoDB store built on the AWS SDK client.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    /// Creates a new store with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TableCatalog for DynamoStore {
    async fn describe_table(&self, table: &str) -> Result<TableDescription, StoreError> {
        let response = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, table))?;

        let description = response.table().ok_or_else(|| StoreError::TableNotFound {
            table: table.to_string(),
        })?;
        description_from_sdk(description)
    }

    async fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let mut start: Option<String> = None;

        loop {
            let response = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start.take())
                .send()
                .await
                .map_err(map_list_tables_error)?;

            names.extend(response.table_names().iter().cloned());
            match response.last_evaluated_table_name() {
                Some(last) => start = Some(last.to_string()),
                None => break,
            }
        }

        Ok(names)
    }
}

impl ItemStore for DynamoStore {
    type Pages = DynamoPages;

    fn scan(&self, table: &str, options: &ReadOptions) -> DynamoPages {
        DynamoPages::Scan(ScanPages {
            client: self.client.clone(),
            table: table.to_string(),
            options: options.clone(),
            cursor: Cursor::default(),
        })
    }

    fn query(&self, condition: KeyCondition, options: &ReadOptions) -> DynamoPages {
        DynamoPages::Query(QueryPages {
            client: self.client.clone(),
            condition,
            options: options.clone(),
            cursor: Cursor::default(),
        })
    }
}

/// Continuation state shared by scans and queries.
#[derive(Debug, Default)]
enum Cursor {
    /// No request issued yet.
    #[default]
    Start,
    /// The store returned a `LastEvaluatedKey`.
    After(Item),
    /// The store reported the last page.
    Done,
}

impl Cursor {
    /// Takes the start key for the next request, or `None` once done.
    fn next_start(&mut self) -> Option<Option<Item>> {
        match std::mem::replace(self, Cursor::Done) {
            Cursor::Start => Some(None),
            Cursor::After(key) => Some(Some(key)),
            Cursor::Done => None,
        }
    }

    fn advance(&mut self, last_evaluated_key: Option<Item>) {
        *self = match last_evaluated_key {
            Some(key) if !key.is_empty() => Cursor::After(key),
            _ => Cursor::Done,
        };
    }
}

/// Pages of a full-table (or index) scan.
#[derive(Debug)]
pub struct ScanPages {
    client: Client,
    table: String,
    options: ReadOptions,
    cursor: Cursor,
}

#[async_trait]
impl PageSource for ScanPages {
    type Record = Item;

    async fn next_page(&mut self) -> Result<Option<Vec<Item>>, StoreError> {
        let Some(start) = self.cursor.next_start() else {
            return Ok(None);
        };

        debug!(table = %self.table, resuming = start.is_some(), "Scan request");
        let output = self
            .client
            .scan()
            .table_name(&self.table)
            .set_index_name(self.options.index_name.clone())
            .set_limit(self.options.page_size)
            .consistent_read(self.options.consistent_read)
            .set_exclusive_start_key(start)
            .send()
            .await
            .map_err(|e| map_scan_error(e, &self.table))?;

        self.cursor.advance(output.last_evaluated_key);
        Ok(Some(output.items.unwrap_or_default()))
    }
}

/// Pages of a key-condition query.
#[derive(Debug)]
pub struct QueryPages {
    client: Client,
    condition: KeyCondition,
    options: ReadOptions,
    cursor: Cursor,
}

#[async_trait]
impl PageSource for QueryPages {
    type Record = Item;

    async fn next_page(&mut self) -> Result<Option<Vec<Item>>, StoreError> {
        let Some(start) = self.cursor.next_start() else {
            return Ok(None);
        };

        let values: HashMap<_, _> = self
            .condition
            .values
            .iter()
            .map(|(placeholder, value)| {
                (placeholder.clone(), typed_value_to_attribute(value.clone()))
            })
            .collect();
        let names: HashMap<_, _> = self.condition.names.clone().into_iter().collect();

        debug!(
            table = %self.condition.table_name,
            expression = %self.condition.expression,
            resuming = start.is_some(),
            "Query request"
        );
        let output = self
            .client
            .query()
            .table_name(&self.condition.table_name)
            .set_index_name(self.condition.index_name.clone())
            .key_condition_expression(&self.condition.expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .set_limit(self.options.page_size)
            .consistent_read(self.options.consistent_read)
            .set_exclusive_start_key(start)
            .send()
            .await
            .map_err(|e| map_query_error(e, &self.condition.table_name))?;

        self.cursor.advance(output.last_evaluated_key);
        Ok(Some(output.items.unwrap_or_default()))
    }
}

/// Either kind of page source, so one store type serves both retrievals.
#[derive(Debug)]
pub enum DynamoPages {
    Scan(ScanPages),
    Query(QueryPages),
}

#[async_trait]
impl PageSource for DynamoPages {
    type Record = Item;

    async fn next_page(&mut self) -> Result<Option<Vec<Item>>, StoreError> {
        match self {
            DynamoPages::Scan(pages) => pages.next_page().await,
            DynamoPages::Query(pages) => pages.next_page().await,
        }
    }
}
