//! Request message formatting and timing.

use folio_config::HttpLogConfig;
use std::fmt::Write as _;
use std::time::Instant;
use tracing::{debug, info};

/// Transport-level start message prefix.
pub const REQUEST_START_PREFIX: &str = "### request start[";
/// Transport-level end message prefix.
pub const REQUEST_END_PREFIX: &str = "### request end[";

/// Timing context created once at request entry.
///
/// Carried in the request extensions so the end of a request is matched to
/// its own start, never to the start of another request that happens to be
/// in flight on the same worker. Elapsed time is measured on a monotonic
/// clock and can never be negative.
#[derive(Debug, Clone, Copy)]
pub struct TimingContext {
    started_at: Instant,
}

impl TimingContext {
    /// Captures the current instant as the request start.
    #[must_use]
    pub fn now() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Elapsed whole milliseconds since request entry.
    #[must_use]
    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Request attributes captured once at the transport boundary.
#[derive(Debug, Clone, Default)]
pub struct RequestRecord {
    /// Lower-cased HTTP method.
    pub method: String,
    /// Request path, without the query string.
    pub path: String,
    /// Raw query string, if any.
    pub query: Option<String>,
    /// Request payload, already capped at the configured maximum.
    pub payload: Option<String>,
    /// Client remote address.
    pub client: Option<String>,
    /// Session id, only if a session already existed on the request.
    pub session: Option<String>,
    /// Remote user identity.
    pub user: Option<String>,
}

/// Log severity for transport-level request messages, resolved once at
/// startup from the configured environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSeverity {
    Info,
    Debug,
}

impl LogSeverity {
    /// Production deployments log routine request traffic at debug.
    #[must_use]
    pub fn for_environment(environment: &str) -> Self {
        if environment == "production" {
            Self::Debug
        } else {
            Self::Info
        }
    }

    /// Emits `message` at this severity.
    pub fn emit(self, message: &str) {
        match self {
            Self::Info => info!(target: "folio::http_log", "{}", message),
            Self::Debug => debug!(target: "folio::http_log", "{}", message),
        }
    }
}

/// Formats transport-level request log messages.
#[derive(Debug, Clone)]
pub struct RequestLogFormatter {
    include_query_string: bool,
    include_payload: bool,
    include_client_info: bool,
}

impl RequestLogFormatter {
    /// Creates a formatter from the logging configuration.
    #[must_use]
    pub fn new(config: &HttpLogConfig) -> Self {
        Self {
            include_query_string: config.include_query_string,
            include_payload: config.include_payload,
            include_client_info: config.include_client_info,
        }
    }

    /// Builds the start message for a request.
    #[must_use]
    pub fn format_start(&self, record: &RequestRecord) -> String {
        let mut msg = String::from(REQUEST_START_PREFIX);
        self.push_fields(&mut msg, record);
        msg.push(']');
        msg
    }

    /// Builds the end message for a request, with the elapsed millisecond
    /// count appended.
    #[must_use]
    pub fn format_end(&self, record: &RequestRecord, timing: &TimingContext) -> String {
        let mut msg = String::from(REQUEST_END_PREFIX);
        self.push_fields(&mut msg, record);
        let _ = write!(msg, "; elapsed={}ms", timing.elapsed_millis());
        msg.push(']');
        msg
    }

    fn push_fields(&self, msg: &mut String, record: &RequestRecord) {
        let _ = write!(msg, "method={}; uri={}", record.method, record.path);

        if self.include_query_string {
            if let Some(query) = record.query.as_deref() {
                if !query.is_empty() {
                    let _ = write!(msg, "?{}", query);
                }
            }
        }

        if self.include_payload {
            if let Some(payload) = record.payload.as_deref() {
                let _ = write!(msg, "; payload={}", payload);
            }
        }

        if self.include_client_info {
            if let Some(client) = record.client.as_deref() {
                let _ = write!(msg, "; client={}", client);
            }
            if let Some(session) = record.session.as_deref() {
                let _ = write!(msg, "; session={}", session);
            }
            if let Some(user) = record.user.as_deref() {
                let _ = write!(msg, "; user={}", user);
            }
        }
    }
}

/// Caps a request payload at `max_len` bytes.
///
/// Returns `None` for an empty body; excess bytes are truncated, and a cut
/// UTF-8 sequence at the boundary is replaced, not treated as an error.
#[must_use]
pub fn cap_payload(body: &[u8], max_len: usize) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let end = body.len().min(max_len);
    Some(String::from_utf8_lossy(&body[..end]).into_owned())
}
