//! Handler-boundary request logging.
//!
//! Applied with `route_layer`, so it only fires for requests that resolved
//! to a controller operation. Unlike the transport wrapper it can buffer and
//! log the response body, and its elapsed time covers the handler alone,
//! excluding routing and the outer middleware stack.

use crate::observability::{LogDecision, LogPolicy};
use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

const START_SEPARATOR: &str =
    "========================================== Start ==========================================";
const END_SEPARATOR: &str =
    "=========================================== End ===========================================";

/// Handler-boundary logging middleware.
///
/// Consumes the [`LogDecision`] placed in the extensions by the transport
/// layer; if mounted without it (tests, partial stacks) the decision is
/// computed here instead.
pub async fn handler_log_middleware(
    State(policy): State<Arc<LogPolicy>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let decision = request
        .extensions()
        .get::<LogDecision>()
        .copied()
        .unwrap_or_else(|| policy.decide(&path));

    if !decision.handler {
        return next.run(request).await;
    }

    let handler_name = policy
        .handler_meta(&path)
        .map_or("unknown", |meta| meta.name);
    let url = full_url(&request);
    let method = request.method().clone();
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_string(), |ConnectInfo(addr)| addr.ip().to_string());
    let args = query_args(request.uri().query().unwrap_or(""));

    info!(target: "folio::handler_log", "{}", START_SEPARATOR);
    info!(target: "folio::handler_log", "URL            : {}", url);
    info!(target: "folio::handler_log", "HTTP Method    : {}", method);
    info!(target: "folio::handler_log", "Handler        : {}", handler_name);
    info!(target: "folio::handler_log", "IP             : {}", client);
    info!(
        target: "folio::handler_log",
        "Request Args   : {}",
        serde_json::to_string(&args).unwrap_or_else(|_| "[]".to_string())
    );

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed().as_millis();

    let response = if response.status().is_server_error() {
        // A propagated handler failure: the response body is not echoed and
        // there is no Time-Consuming line, but the failure still gets a
        // timed record of its own.
        warn!(
            target: "folio::handler_log",
            "Handler failed : status={}; elapsed={} ms",
            response.status().as_u16(),
            elapsed
        );
        response
    } else {
        let (response, body) = buffer_response(response).await;
        info!(target: "folio::handler_log", "Response Args  : {}", body);
        info!(target: "folio::handler_log", "Time-Consuming : {} ms", elapsed);
        response
    };

    info!(target: "folio::handler_log", "{}", END_SEPARATOR);
    // Blank line between requests.
    info!(target: "folio::handler_log", "");

    response
}

/// Buffers the response body for logging and reassembles the response
/// unchanged.
async fn buffer_response(response: Response) -> (Response, String) {
    let (parts, body) = response.into_parts();
    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            (Response::from_parts(parts, Body::from(bytes)), text)
        }
        Err(e) => {
            // The stream failed mid-read; the body is gone either way.
            error!("Failed to buffer response body for logging: {}", e);
            (
                Response::from_parts(parts, Body::empty()),
                String::new(),
            )
        }
    }
}

/// Reconstructs the full request URL from the Host header and URI.
fn full_url(request: &Request<Body>) -> String {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{}{}", host, request.uri())
}

/// Serializes query string values as the handler's argument list.
///
/// Values that parse as integers are logged as JSON numbers, everything
/// else as strings.
fn query_args(query: &str) -> Vec<serde_json::Value> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let value = pair.split_once('=').map_or("", |(_, v)| v);
            value
                .parse::<i64>()
                .map(serde_json::Value::from)
                .unwrap_or_else(|_| serde_json::Value::from(value))
        })
        .collect()
}
