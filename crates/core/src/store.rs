//! Collaborator interfaces the core consumes.
//!
//! The AWS implementations live in `dynq_client::store`; tests use in-memory
//! fakes.

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::schema::TableDescription;

/// A flattened record: attribute name to generic JSON value, ordered by name.
pub type ResultItem = serde_json::Map<String, serde_json::Value>;

/// Table metadata operations.
#[async_trait]
pub trait TableCatalog: Send + Sync {
    /// Describes a table's key schema and attribute types.
    async fn describe_table(&self, table: &str) -> std::result::Result<TableDescription, StoreError>;

    /// Lists every table name.
    async fn list_tables(&self) -> std::result::Result<Vec<String>, StoreError>;
}

/// A lazy sequence of result pages (scan or query).
///
/// Each call to [`PageSource::next_page`] issues at most one store request.
/// Returns `Ok(None)` once the store has reported that no pages remain.
#[async_trait]
pub trait PageSource: Send {
    type Record: Send;

    async fn next_page(&mut self) -> std::result::Result<Option<Vec<Self::Record>>, StoreError>;
}

/// Outcome of forwarding one item to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    Accepted,
    /// The consumer stopped reading. Not an error.
    Closed,
}

/// Destination for emitted items.
pub trait ItemSink {
    fn write_item(&mut self, item: &ResultItem) -> Result<SinkStatus>;

    /// Flushes anything buffered. Called once after emission stops.
    fn finish(&mut self) -> Result<SinkStatus> {
        Ok(SinkStatus::Accepted)
    }
}
