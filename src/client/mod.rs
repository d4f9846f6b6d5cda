//! # HTTP client seam
//!
//! Scenario code talks to the API through the [`Transport`] trait: one
//! [`ApiRequest`] in, one [`ApiResponse`] out. Two transports exist:
//!
//! - [`GooseTransport`] wraps the `GooseUser` of a virtual user, so requests are
//!   timed and reported by goose as part of the attack;
//! - [`HttpTransport`] is a plain `reqwest` client used for the one-time setup
//!   and teardown hooks that run outside the attack.
//!
//! Tests substitute a scripted transport and never open a socket.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::LoadTestConfig;

pub mod endpoints;
pub mod goose_transport;
pub mod http_transport;
pub mod session;

pub use endpoints::Endpoint;
pub use goose_transport::GooseTransport;
pub use http_transport::HttpTransport;
pub use session::Session;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const APPLICATION_JSON: &str = "application/json";

/// Request headers, ordered by name
pub type Headers = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// A fully resolved request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Grouping name for metrics, e.g. `GET /articles/{slug}`
    pub name: &'static str,
    pub headers: Headers,
    /// Serialized JSON body
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(endpoint: &Endpoint, config: &LoadTestConfig) -> Self {
        Self {
            method: endpoint.method(),
            url: config.url(&endpoint.path()),
            name: endpoint.name(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Add (or replace) every header in `headers`.
    pub fn with_headers(mut self, headers: &Headers) -> Self {
        self.headers
            .extend(headers.iter().map(|(name, value)| (*name, value.clone())));
        self
    }

    /// Attach a JSON body and the matching content type.
    ///
    /// A body that fails to serialize is logged and sent empty.
    pub fn with_json<B: Serialize>(mut self, body: &B) -> Self {
        self.headers.insert(CONTENT_TYPE, APPLICATION_JSON.to_string());
        self.body = match serde_json::to_string(body) {
            Ok(json) => Some(json),
            Err(err) => {
                tracing::warn!(request = self.name, error = %err, "request body not serializable");
                None
            }
        };
        self
    }

    /// Path component of the URL, used by tests and logs
    pub fn path(&self) -> &str {
        match self.url.find("://") {
            Some(scheme_end) => {
                let rest = &self.url[scheme_end + 3..];
                rest.find('/').map(|idx| &rest[idx..]).unwrap_or("/")
            }
            None => &self.url,
        }
    }
}

/// Status and raw body of a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status, `0` when the request never produced a response
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response standing in for a transport failure
    pub fn transport_failure() -> Self {
        Self::default()
    }

    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Value at a dotted path such as `user.token`; `None` when the body is not
    /// JSON or the path is absent.
    pub fn json_path(&self, path: &str) -> Option<Value> {
        let pointer = format!("/{}", path.replace('.', "/"));
        self.json()?.pointer(&pointer).cloned()
    }

    /// String at a dotted path; `None` for absent or non-string values.
    pub fn json_str(&self, path: &str) -> Option<String> {
        match self.json_path(path)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the dotted path exists and is not `null`
    pub fn has_value(&self, path: &str) -> bool {
        self.json_path(path).is_some_and(|v| !v.is_null())
    }
}

/// A request that produced no HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Sends one request and waits for its full response
#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
