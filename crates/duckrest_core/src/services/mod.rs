//! Service layer for the duckrest client.
//!
//! - `client` - Authenticated HTTP transport and the public operations
//! - `decode` - Response body decoding into models and error messages

pub mod client;
pub mod decode;

pub use client::DuckRestClient;
