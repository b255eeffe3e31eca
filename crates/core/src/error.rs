use thiserror::Error;

/// Errors reported by the store collaborators (catalog and page sources).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Table '{table}' not found")]
    TableNotFound { table: String },
    #[error("Store request failed: {0}")]
    Request(String),
}

/// Errors that can occur while translating or running a query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Failed to resolve schema for table '{table}': {message}")]
    SchemaResolution { table: String, message: String },
    #[error("Unknown attribute: {name}")]
    UnknownAttribute { name: String },
    #[error("Table '{table}' has no sort key")]
    MissingSortKey { table: String },
    #[error("Page {page} request failed: {message}")]
    StoreRequest { page: usize, message: String },
    #[error("Conversion error: {0}")]
    Conversion(String),
    #[error("Output error: {0}")]
    Output(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
