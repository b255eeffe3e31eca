//! Client error types.

use dynq_core::{QueryError, StoreError};
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_display_unchanged() {
        let err: ClientError = StoreError::TableNotFound {
            table: "Orders".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Table 'Orders' not found");

        let err: ClientError = QueryError::MissingSortKey {
            table: "Sessions".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Table 'Sessions' has no sort key");
    }
}
