//! Data models for the duckrest client.
//!
//! - `endpoint` - Endpoint descriptors and request bodies
//! - `tabular` - TabularResult
//! - `execution` - ExecutionResult
//! - `metadata` - TableSummary, DatabaseInfo, TableSchema

pub mod endpoint;
pub mod execution;
pub mod metadata;
pub mod tabular;

pub use endpoint::{Endpoint, QueryRequest};
pub use execution::ExecutionResult;
pub use metadata::{DatabaseInfo, TableSchema, TableSummary};
pub use tabular::TabularResult;
