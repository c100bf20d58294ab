//! Hyper transport for the router
//!
//! One task per connection over http1. Requests are converted into
//! [`ApiRequest`] values, dispatched through the router, and the
//! [`ApiResponse`] is serialized back with JSON and permissive CORS
//! headers so the admin SPA can call the API from another origin.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use super::{ApiRequest, ApiResponse, Router, CONTENT_TYPE_JSON};

pub struct HttpServer {
    router: Arc<Router>,
    max_body_size: usize,
}

impl HttpServer {
    pub fn new(router: Router, max_body_size: usize) -> Self {
        Self { router: Arc::new(router), max_body_size }
    }

    /// Bind and serve until the process is stopped
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        log::info!("listening on http://{} ({} routes)", addr, self.router.route_count());

        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let router = self.router.clone();
            let max_body_size = self.max_body_size;

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let router = router.clone();
                    async move { handle(req, router, max_body_size).await }
                });
                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    log::debug!("connection from {} ended with error: {:?}", peer, err);
                }
            });
        }
    }
}

async fn handle(
    req: Request<Incoming>,
    router: Arc<Router>,
    max_body_size: usize,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    if req.method() == Method::OPTIONS {
        return Ok(preflight_response());
    }

    let api_req = match convert_request(req, max_body_size).await {
        Ok(r) => r,
        Err(resp) => return Ok(convert_response(&resp)),
    };

    log::debug!("{} {}", api_req.method, api_req.path);
    let api_resp = router.dispatch(&api_req);
    Ok(convert_response(&api_resp))
}

async fn convert_request(
    req: Request<Incoming>,
    max_body_size: usize,
) -> Result<ApiRequest, ApiResponse> {
    let method = req.method().clone();
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let bearer_token = req
        .headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    let declared_len = req
        .headers()
        .get(hyper::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    if declared_len > max_body_size {
        return Err(ApiResponse::error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            &format!("request body exceeds {} bytes", max_body_size),
        ));
    }

    let body = req.collect().await.map_err(|e| {
        ApiResponse::error(
            StatusCode::BAD_REQUEST,
            "bad_request",
            &format!("failed to read request body: {}", e),
        )
    })?;
    let body = body.to_bytes();
    if body.len() > max_body_size {
        return Err(ApiResponse::error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            &format!("request body exceeds {} bytes", max_body_size),
        ));
    }

    let mut api_req = ApiRequest::new(method, &path_and_query).with_body(body);
    api_req.bearer_token = bearer_token;
    Ok(api_req)
}

fn convert_response(resp: &ApiResponse) -> Response<Full<Bytes>> {
    let body = match &resp.body {
        Some(value) => Bytes::from(value.to_string()),
        None => Bytes::new(),
    };

    let mut builder = Response::builder()
        .status(resp.status)
        .header("Access-Control-Allow-Origin", "*");
    if !body.is_empty() {
        builder = builder.header("Content-Type", CONTENT_TYPE_JSON);
    }

    builder.body(Full::new(body)).unwrap_or_else(|_| {
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}
