//! dynq_client - CLI for browsing and querying DynamoDB tables.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod store;

pub use error::{ClientError, Result};
pub use store::DynamoStore;
