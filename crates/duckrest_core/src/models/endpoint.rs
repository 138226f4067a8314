//! Endpoint descriptors and request bodies.

use reqwest::Method;
use serde::Serialize;

/// The fixed set of endpoints exposed by the REST wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /health`
    Health,
    /// `GET /tables`
    Tables,
    /// `GET /info`
    Info,
    /// `GET /schema/{table}`
    Schema,
    /// `POST /query`
    Query,
    /// `POST /execute`
    Execute,
}

impl Endpoint {
    /// Every endpoint, in wire-table order.
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Health,
        Endpoint::Tables,
        Endpoint::Info,
        Endpoint::Schema,
        Endpoint::Query,
        Endpoint::Execute,
    ];

    /// Endpoint name, also its first path segment.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Tables => "tables",
            Self::Info => "info",
            Self::Schema => "schema",
            Self::Query => "query",
            Self::Execute => "execute",
        }
    }

    /// HTTP method used for this endpoint.
    pub fn method(&self) -> Method {
        if self.takes_body() {
            Method::POST
        } else {
            Method::GET
        }
    }

    /// Whether requests carry a JSON body.
    pub fn takes_body(&self) -> bool {
        matches!(self, Self::Query | Self::Execute)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} /{}", self.method(), self.name())
    }
}

/// Body for `POST /query` and `POST /execute`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    /// SQL text, passed through untouched.
    pub query: &'a str,
}
