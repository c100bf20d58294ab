//! HTTP surface of the engine
//!
//! Handlers work against [`ApiRequest`] / [`ApiResponse`] instead of raw
//! hyper types so that the routing and the REST semantics are testable
//! without a socket. [`server`] owns the hyper plumbing.

pub mod api;
pub mod router;
pub mod server;

use std::collections::HashMap;

use bytes::Bytes;
use hyper::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::EngineError;

pub use api::{build_router, Namespace};
pub use router::{PathParams, Route, Router};
pub use server::HttpServer;

/// Content types used on the wire
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A parsed inbound request, decoupled from the transport
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    /// Token from an `Authorization: Bearer ...` header, if present
    pub bearer_token: Option<String>,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        let (path, query) = split_path_and_query(path);
        Self { method, path, query, bearer_token: None, body: Bytes::new() }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(|s| s.as_str())
    }

    /// Parse the body as JSON into the given type
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, ApiResponse> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ApiResponse::error(StatusCode::BAD_REQUEST, "bad_request", &format!("invalid JSON body: {}", e))
        })
    }
}

/// Response payload handed back to the transport layer
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: StatusCode::OK, body: Some(body) }
    }

    pub fn created(body: Value) -> Self {
        Self { status: StatusCode::CREATED, body: Some(body) }
    }

    pub fn no_content() -> Self {
        Self { status: StatusCode::NO_CONTENT, body: None }
    }

    /// Standard JSON error body: `{"error": tag, "message": detail}`
    pub fn error(status: StatusCode, tag: &str, message: &str) -> Self {
        Self { status, body: Some(json!({ "error": tag, "message": message })) }
    }

    pub fn not_found(message: &str) -> Self {
        Self::error(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// Map an engine error to its HTTP shape. Nothing here is fatal: every
    /// variant becomes a JSON error response.
    pub fn from_engine_error(err: &EngineError) -> Self {
        let status = match err {
            EngineError::Auth(_) => StatusCode::UNAUTHORIZED,
            EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::error(status, err.tag(), &err.to_string())
    }
}

fn split_path_and_query(full: &str) -> (String, HashMap<String, String>) {
    let mut parts = full.splitn(2, '?');
    let path = parts.next().unwrap_or("").to_string();
    let mut query = HashMap::new();
    if let Some(raw) = parts.next() {
        for pair in raw.split('&') {
            let mut kv = pair.splitn(2, '=');
            if let Some(key) = kv.next() {
                if !key.is_empty() {
                    query.insert(key.to_string(), kv.next().unwrap_or("").to_string());
                }
            }
        }
    }
    (path, query)
}
