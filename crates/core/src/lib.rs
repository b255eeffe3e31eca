//! dynq_core - query translation and bounded emission for dynq.
//!
//! Everything in this crate is store-agnostic. The AWS shell lives in
//! `dynq_client` and plugs in through the traits in [`store`].

pub mod emitter;
pub mod error;
pub mod expression;
pub mod request;
pub mod schema;
pub mod store;

pub use emitter::{emit, EmissionReport, EmissionState, Termination};
pub use error::{QueryError, Result, StoreError};
pub use expression::{parse_sort_expr, SortCondition};
pub use request::{build_key_condition, KeyCondition, TypedValue};
pub use schema::{
    resolve_schema, IndexDescription, KeyElement, KeyRole, ScalarType, TableDescription,
    TableSchema,
};
pub use store::{ItemSink, PageSource, ResultItem, SinkStatus, TableCatalog};
