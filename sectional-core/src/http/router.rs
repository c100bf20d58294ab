//! Method + pattern routing
//!
//! Patterns are literal segments with `:name` placeholders, matched
//! segment-for-segment (`/sections/:id/data/:entry_id`). Handlers receive
//! the request and the extracted path parameters.

use std::collections::HashMap;
use std::sync::Arc;

use hyper::Method;

use super::{ApiRequest, ApiResponse};

/// Path parameters extracted from `:name` placeholders
pub type PathParams = HashMap<String, String>;

type Handler = Arc<dyn Fn(&ApiRequest, &PathParams) -> ApiResponse + Send + Sync>;

/// A single route definition
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    handler: Handler,
}

impl Route {
    pub fn new<F>(method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest, &PathParams) -> ApiResponse + Send + Sync + 'static,
    {
        Self { method, pattern: pattern.to_string(), handler: Arc::new(handler) }
    }

    /// Path parameters if this route matches the request, else None
    pub fn matches(&self, request: &ApiRequest) -> Option<PathParams> {
        if self.method != request.method {
            return None;
        }
        self.extract_params(&request.path)
    }

    fn extract_params(&self, path: &str) -> Option<PathParams> {
        let pattern_parts: Vec<&str> = self.pattern.split('/').collect();
        let path_parts: Vec<&str> = path.split('/').collect();
        if pattern_parts.len() != path_parts.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
            if let Some(name) = pattern_part.strip_prefix(':') {
                params.insert(name.to_string(), path_part.to_string());
            } else if pattern_part != path_part {
                return None;
            }
        }
        Some(params)
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// Request dispatcher
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn get<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest, &PathParams) -> ApiResponse + Send + Sync + 'static,
    {
        self.route(Route::new(Method::GET, pattern, handler))
    }

    pub fn post<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest, &PathParams) -> ApiResponse + Send + Sync + 'static,
    {
        self.route(Route::new(Method::POST, pattern, handler))
    }

    pub fn put<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest, &PathParams) -> ApiResponse + Send + Sync + 'static,
    {
        self.route(Route::new(Method::PUT, pattern, handler))
    }

    pub fn delete<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest, &PathParams) -> ApiResponse + Send + Sync + 'static,
    {
        self.route(Route::new(Method::DELETE, pattern, handler))
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Dispatch a request to the first matching route
    pub fn dispatch(&self, request: &ApiRequest) -> ApiResponse {
        for route in &self.routes {
            if let Some(params) = route.matches(request) {
                return (route.handler)(request, &params);
            }
        }
        ApiResponse::not_found(&format!("no route for {} {}", request.method, request.path))
    }
}
