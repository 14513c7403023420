//! Transport-level request logging.
//!
//! A hand-rolled tower layer wrapping the whole router, so it observes every
//! inbound request before route dispatch: requests that match a handler,
//! requests that 404, everything. It logs request-side data and total
//! wall-clock time. It operates on the serialized request stream and never
//! sees a handler's return value; the handler-boundary middleware covers
//! that side.

use crate::observability::{
    cap_payload, LogPolicy, RemoteUser, RequestRecord, TimingContext, SESSION_COOKIE,
};
use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use futures::future::BoxFuture;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

/// Tower layer applying [`HttpLogService`].
#[derive(Clone)]
pub struct HttpLogLayer {
    policy: Arc<LogPolicy>,
    body_limit: usize,
}

impl HttpLogLayer {
    /// Creates the layer.
    ///
    /// `body_limit` bounds how much of a request body is buffered for
    /// payload logging; it should match the server's maximum body size.
    #[must_use]
    pub fn new(policy: Arc<LogPolicy>, body_limit: usize) -> Self {
        Self { policy, body_limit }
    }
}

impl<S> Layer<S> for HttpLogLayer {
    type Service = HttpLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpLogService {
            inner,
            policy: Arc::clone(&self.policy),
            body_limit: self.body_limit,
        }
    }
}

/// Transport-level request logging service.
#[derive(Clone)]
pub struct HttpLogService<S> {
    inner: S,
    policy: Arc<LogPolicy>,
    body_limit: usize,
}

impl<S> Service<Request<Body>> for HttpLogService<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let policy = Arc::clone(&self.policy);
        let body_limit = self.body_limit;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let path = req.uri().path().to_string();
            let decision = policy.decide(&path);
            let timing = TimingContext::now();

            let mut req = req;
            req.extensions_mut().insert(decision);
            req.extensions_mut().insert(timing);

            if !decision.transport {
                // Suppressed or excluded: neither message is constructed.
                return inner.call(req).await;
            }

            let (record, req) = match snapshot_request(req, &policy, body_limit).await {
                Ok(parts) => parts,
                Err(response) => return Ok(response),
            };

            policy.severity().emit(&policy.formatter().format_start(&record));

            let response = inner.call(req).await?;

            policy
                .severity()
                .emit(&policy.formatter().format_end(&record, &timing));

            Ok(response)
        })
    }
}

/// Captures the loggable request attributes and reassembles the request
/// unchanged.
///
/// Buffering the body is the only way to log the payload without consuming
/// the stream the handler needs; the full body is retained and handed back,
/// only the logged copy is capped.
async fn snapshot_request(
    req: Request<Body>,
    policy: &LogPolicy,
    body_limit: usize,
) -> Result<(RequestRecord, Request<Body>), Response> {
    let method = req.method().as_str().to_lowercase();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let (client, session, user) = if policy.include_client_info() {
        client_info(&req)
    } else {
        (None, None, None)
    };

    let (payload, req) = if policy.include_payload() {
        let (parts, body) = req.into_parts();
        let bytes = match to_bytes(body, body_limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to buffer request body for logging: {}", e);
                return Err(StatusCode::PAYLOAD_TOO_LARGE.into_response());
            }
        };
        let payload = cap_payload(&bytes, policy.max_payload_length());
        (payload, Request::from_parts(parts, Body::from(bytes)))
    } else {
        (None, req)
    };

    let record = RequestRecord {
        method,
        path,
        query,
        payload,
        client,
        session,
        user,
    };

    Ok((record, req))
}

/// Reads client address, session id, and remote user from the request.
///
/// The session id is read from an existing cookie only; logging never sets
/// one.
fn client_info(req: &Request<Body>) -> (Option<String>, Option<String>, Option<String>) {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let session = CookieJar::from_headers(req.headers())
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());

    // Prefer an identity set by an in-process auth layer; fall back to the
    // header a fronting proxy would carry it in.
    let user = req
        .extensions()
        .get::<RemoteUser>()
        .map(|user| user.0.clone())
        .or_else(|| {
            req.headers()
                .get("x-remote-user")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        });

    (client, session, user)
}
