//! HTTP transport for the DuckDB REST wrapper.
//!
//! Each public method is one request/response cycle:
//! build the authenticated request, send it, map the status, decode the body.
//! Nothing is retried and nothing is cached between calls.

use crate::config::{ClientConfig, ClientOptions, SchemaPathEncoding};
use crate::error::{DuckRestError, Result};
use crate::models::{Endpoint, ExecutionResult, QueryRequest, TableSchema, TabularResult};
use crate::services::decode;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Longest statement keyword included in log lines.
const SQL_KEYWORD_MAX_CHARS: usize = 16;

/// Typed client for the remote database.
///
/// Cheap to clone. Clones share the configuration and the underlying
/// `reqwest::Client`, whose connection pool is safe for concurrent use, so a
/// single instance can serve many tasks at once.
#[derive(Clone)]
pub struct DuckRestClient {
    config: Arc<ClientConfig>,
    options: ClientOptions,
    http_client: reqwest::Client,
}

impl DuckRestClient {
    /// Create a client for `base_url` authenticating with `auth_token`.
    ///
    /// Performs no network I/O and returns no error. The default
    /// `reqwest::Client` panics if the TLS backend cannot be initialized;
    /// use [`with_http_client`](Self::with_http_client) with a client from
    /// `reqwest::Client::builder().build()` to handle that case as an error.
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(base_url, auth_token))
    }

    /// Create a client from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self::with_options(config, ClientOptions::default())
    }

    /// Create a client with transport options.
    pub fn with_options(config: ClientConfig, options: ClientOptions) -> Self {
        Self::with_http_client(config, options, reqwest::Client::new())
    }

    /// Create a client on top of a caller-configured `reqwest::Client`.
    ///
    /// Never panics: all fallible transport setup happened when `http_client` was built.
    pub fn with_http_client(
        config: ClientConfig,
        options: ClientOptions,
        http_client: reqwest::Client,
    ) -> Self {
        tracing::debug!(
            base_url = %config.base_url(),
            timeout_ms = options.timeout.map(|t| t.as_millis() as u64),
            schema_path_encoding = ?options.schema_path_encoding,
            "DuckRestClient created"
        );
        Self { config: Arc::new(config), options, http_client }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the transport options.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    // ========== Operations ==========

    /// Check if the server is healthy. `GET /health`.
    pub async fn health_check(&self) -> Result<Map<String, Value>> {
        let url = self.endpoint_url(Endpoint::Health);
        let body = self.send(Endpoint::Health, url, None).await?;
        Ok(decode::decode_health(body))
    }

    /// List all tables with their row counts. `GET /tables`.
    pub async fn list_tables(&self) -> Result<TabularResult> {
        let url = self.endpoint_url(Endpoint::Tables);
        let body = self.send(Endpoint::Tables, url, None).await?;
        decode::decode_tables(body).inspect_err(|e| log_decode_failure(Endpoint::Tables, e))
    }

    /// Get overall database information. `GET /info`.
    ///
    /// `table_count` and `tables` must be present; the mapping is then
    /// returned as received, extra keys included. Use
    /// [`DatabaseInfo::from_map`](crate::models::DatabaseInfo::from_map) for a typed view.
    pub async fn get_info(&self) -> Result<Map<String, Value>> {
        let url = self.endpoint_url(Endpoint::Info);
        let body = self.send(Endpoint::Info, url, None).await?;
        decode::decode_info(body).inspect_err(|e| log_decode_failure(Endpoint::Info, e))
    }

    /// Get the column description of a table. `GET /schema/{table}`.
    ///
    /// How `table_name` lands in the path depends on
    /// [`ClientOptions::schema_path_encoding`].
    pub async fn get_schema(&self, table_name: &str) -> Result<TabularResult> {
        let url = self.schema_url(table_name)?;
        let body = self.send(Endpoint::Schema, url, None).await?;
        decode::decode_schema_columns(body).inspect_err(|e| log_decode_failure(Endpoint::Schema, e))
    }

    /// Like [`get_schema`](Self::get_schema), keeping the table name and row count.
    pub async fn describe_table(&self, table_name: &str) -> Result<TableSchema> {
        let url = self.schema_url(table_name)?;
        let body = self.send(Endpoint::Schema, url, None).await?;
        decode::decode_table_schema(body).inspect_err(|e| log_decode_failure(Endpoint::Schema, e))
    }

    /// Run a read query. `POST /query`.
    ///
    /// A server-reported row count of zero yields an empty result, not an error.
    pub async fn query(&self, sql: &str) -> Result<TabularResult> {
        let url = self.endpoint_url(Endpoint::Query);
        let body = self.send(Endpoint::Query, url, Some(QueryRequest { query: sql })).await?;
        let result =
            decode::decode_query(body).inspect_err(|e| log_decode_failure(Endpoint::Query, e))?;
        tracing::debug!(
            row_count = result.row_count(),
            column_count = result.column_count(),
            "Query decoded"
        );
        Ok(result)
    }

    /// Run a write or DDL statement. `POST /execute`.
    ///
    /// Atomicity, if any, is the server's business.
    pub async fn execute(&self, sql: &str) -> Result<ExecutionResult> {
        let url = self.endpoint_url(Endpoint::Execute);
        let body = self.send(Endpoint::Execute, url, Some(QueryRequest { query: sql })).await?;
        let result =
            decode::decode_execute(body).inspect_err(|e| log_decode_failure(Endpoint::Execute, e))?;
        tracing::debug!(
            message = %result.message,
            rows_affected = result.rows_affected(),
            "Statement executed"
        );
        Ok(result)
    }

    // ========== Transport ==========

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.config.base_url(), endpoint.name())
    }

    fn schema_url(&self, table_name: &str) -> Result<String> {
        let base = self.config.base_url();
        match self.options.schema_path_encoding {
            SchemaPathEncoding::Raw => Ok(format!("{base}/schema/{table_name}")),
            SchemaPathEncoding::Percent => {
                let mut url = url::Url::parse(base).map_err(|e| {
                    DuckRestError::transport_with_source(format!("Invalid base URL '{base}'"), e)
                })?;
                url.path_segments_mut()
                    .map_err(|_| {
                        DuckRestError::transport(format!("Base URL '{base}' cannot take a path"))
                    })?
                    .pop_if_empty()
                    .push(Endpoint::Schema.name())
                    .push(table_name);
                Ok(url.into())
            }
        }
    }

    /// Send one request and return the decoded JSON object of a success response.
    async fn send(
        &self,
        endpoint: Endpoint,
        url: String,
        body: Option<QueryRequest<'_>>,
    ) -> Result<Map<String, Value>> {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        match &body {
            Some(b) => tracing::debug!(
                %request_id,
                endpoint = endpoint.name(),
                sql_keyword = %sql_keyword(b.query),
                sql_len = b.query.len(),
                "Sending request"
            ),
            None => tracing::debug!(%request_id, endpoint = endpoint.name(), %url, "Sending request"),
        }

        let mut request = self
            .http_client
            .request(endpoint.method(), &url)
            .bearer_auth(self.config.auth_token())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = &body {
            request = request.json(body);
        }
        if let Some(timeout) = self.options.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(
                %request_id,
                endpoint = endpoint.name(),
                error = %e,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Request failed before a response was received"
            );
            DuckRestError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(
                %request_id,
                endpoint = endpoint.name(),
                error = %e,
                "Failed to read response body"
            );
            DuckRestError::from(e)
        })?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if status.is_client_error() || status.is_server_error() {
            let message = decode::extract_error_message(&bytes);
            tracing::warn!(
                %request_id,
                endpoint = endpoint.name(),
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                elapsed_ms,
                "Server returned an error status"
            );
            return Err(DuckRestError::server(status.as_u16(), message));
        }

        tracing::debug!(
            %request_id,
            endpoint = endpoint.name(),
            status = status.as_u16(),
            body_bytes = bytes.len(),
            elapsed_ms,
            "Response received"
        );

        decode::parse_body(endpoint, &bytes).inspect_err(|e| log_decode_failure(endpoint, e))
    }
}

impl std::fmt::Debug for DuckRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckRestClient")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish()
    }
}

fn log_decode_failure(endpoint: Endpoint, error: &DuckRestError) {
    tracing::warn!(endpoint = endpoint.name(), error = %error, "Failed to decode response");
}

/// Leading keyword of a statement (`SELECT`, `INSERT`, ...). Literal values never reach logs.
fn sql_keyword(sql: &str) -> String {
    sql.split(|c: char| !c.is_ascii_alphabetic())
        .find(|word| !word.is_empty())
        .map(|word| word.chars().take(SQL_KEYWORD_MAX_CHARS).collect::<String>().to_uppercase())
        .unwrap_or_default()
}
