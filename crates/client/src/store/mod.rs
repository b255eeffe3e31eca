//! DynamoDB store adapter.
//!
//! Implements the `dynq_core::store` traits on top of `aws-sdk-dynamodb`.

mod client;
pub mod conversions;
mod error;

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use dynq_core::{KeyCondition, PageSource, TableCatalog};

pub use client::{DynamoPages, DynamoStore, QueryPages, ScanPages};

/// A raw DynamoDB item.
pub type Item = HashMap<String, AttributeValue>;

/// Read settings shared by scans and queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub index_name: Option<String>,
    pub page_size: Option<i32>,
    pub consistent_read: bool,
}

/// A catalog that can also open scans and queries over raw items.
pub trait ItemStore: TableCatalog {
    type Pages: PageSource<Record = Item>;

    /// Opens a full-table (or full-index) scan.
    fn scan(&self, table: &str, options: &ReadOptions) -> Self::Pages;

    /// Opens a key-condition query. The index comes from the condition.
    fn query(&self, condition: KeyCondition, options: &ReadOptions) -> Self::Pages;
}
