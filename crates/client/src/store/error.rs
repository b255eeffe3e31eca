//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `dynq_core`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::list_tables::ListTablesError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use dynq_core::StoreError;

/// Map a DescribeTable SDK error to StoreError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => StoreError::TableNotFound {
            table: table.to_string(),
        },
        DescribeTableError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => StoreError::Request(format!(
            "DescribeTable failed: {}",
            DisplayErrorContext(err)
        )),
    }
}

/// Map a ListTables SDK error to StoreError.
pub fn map_list_tables_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ListTablesError, R>,
) -> StoreError {
    match err.into_service_error() {
        ListTablesError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => StoreError::Request(format!("ListTables failed: {}", DisplayErrorContext(err))),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => StoreError::TableNotFound {
            table: table.to_string(),
        },
        ScanError::ProvisionedThroughputExceededException(_) => {
            StoreError::Request("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            StoreError::Request("Request limit exceeded, please retry".to_string())
        }
        ScanError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => StoreError::Request(format!("Scan failed: {}", DisplayErrorContext(err))),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => StoreError::TableNotFound {
            table: table.to_string(),
        },
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::Request("Throughput exceeded, please retry".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::Request("Request limit exceeded, please retry".to_string())
        }
        QueryError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => StoreError::Request(format!("Query failed: {}", DisplayErrorContext(err))),
    }
}
