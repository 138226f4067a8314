//! Typed client for a remote DuckDB REST wrapper.
//!
//! This crate provides:
//!
//! - **config**: Base URL, token and transport options
//! - **error**: Transport / Server / Decode error taxonomy
//! - **models**: Tabular and execution results, endpoint descriptors, metadata views
//! - **services**: The HTTP client and response decoders
//! - **logging**: Structured logging setup
//!
//! ```rust,no_run
//! use duckrest_core::DuckRestClient;
//!
//! # async fn example() -> duckrest_core::Result<()> {
//! let client = DuckRestClient::new("https://db.example.com", "token-abc");
//!
//! let tables = client.list_tables().await?;
//! for summary in tables.table_summaries()? {
//!     println!("{:20} {:>10}", summary.table, summary.rows);
//! }
//!
//! let result = client.query("SELECT zone, year FROM data_summary ORDER BY zone").await?;
//! println!("{} rows", result.row_count());
//!
//! let outcome = client.execute("DROP TABLE IF EXISTS scratch").await?;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use config::{ClientConfig, ClientOptions, SchemaPathEncoding};
pub use error::{DuckRestError, ErrorInfo, Result};
pub use models::{DatabaseInfo, Endpoint, ExecutionResult, TableSchema, TableSummary, TabularResult};
pub use services::DuckRestClient;
