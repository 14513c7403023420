//! Single decision point for request logging.

use crate::observability::{
    HandlerMeta, HandlerRegistry, LogSeverity, RequestLogFormatter,
};
use folio_config::HttpLogConfig;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::error;

/// Where a request gets logged, decided once at the transport boundary.
///
/// Stored in the request extensions so both wrap points consume the same
/// decision instead of re-running their own suppression logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDecision {
    /// Emit transport-level start/end messages.
    pub transport: bool,
    /// Emit handler-boundary messages.
    pub handler: bool,
}

/// Request logging policy.
///
/// Owns the exclusion set, the handler metadata registry, the formatter, and
/// the severity resolved from the configured environment. Everything here is
/// immutable after startup.
pub struct LogPolicy {
    enabled: bool,
    http_log_enabled: bool,
    exclude_urls: HashSet<String>,
    registry: Arc<HandlerRegistry>,
    severity: LogSeverity,
    formatter: RequestLogFormatter,
    include_payload: bool,
    include_client_info: bool,
    max_payload_length: usize,
}

impl LogPolicy {
    /// Creates a policy from configuration.
    ///
    /// `environment` is the explicit `app.environment` config field, read
    /// once here rather than re-derived from any global at first use.
    #[must_use]
    pub fn new(config: &HttpLogConfig, environment: &str, registry: Arc<HandlerRegistry>) -> Self {
        Self {
            enabled: config.enabled,
            http_log_enabled: config.enable_http_log,
            exclude_urls: config.exclude_http_log_urls.clone(),
            registry,
            severity: LogSeverity::for_environment(environment),
            formatter: RequestLogFormatter::new(config),
            include_payload: config.include_payload,
            include_client_info: config.include_client_info,
            max_payload_length: config.max_payload_length,
        }
    }

    /// Whether the exact path is excluded from transport-level logging.
    ///
    /// Exact string match only; no wildcard or prefix semantics.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude_urls.contains(path)
    }

    /// Decides, once per request, which emitters fire.
    #[must_use]
    pub fn decide(&self, path: &str) -> LogDecision {
        LogDecision {
            transport: self.enabled && self.http_log_enabled && !self.is_excluded(path),
            handler: self.enabled && !self.is_skipped(path),
        }
    }

    /// Fail-open skip check.
    ///
    /// A registry failure is logged and resolved as "not skipped": an
    /// internal fault in the metadata lookup must never mute logging for the
    /// wrong request, and must never block the request itself.
    fn is_skipped(&self, path: &str) -> bool {
        match self.registry.resolve(path) {
            Ok(meta) => meta.is_some_and(|m| m.skip_logging),
            Err(e) => {
                error!("Failed to resolve handler metadata for {}: {}", path, e);
                false
            }
        }
    }

    /// Resolves handler metadata for display purposes.
    #[must_use]
    pub fn handler_meta(&self, path: &str) -> Option<HandlerMeta> {
        self.registry.resolve(path).ok().flatten()
    }

    /// Severity for transport-level messages.
    #[must_use]
    pub const fn severity(&self) -> LogSeverity {
        self.severity
    }

    /// The transport-level message formatter.
    #[must_use]
    pub const fn formatter(&self) -> &RequestLogFormatter {
        &self.formatter
    }

    /// Whether the request payload is captured for logging.
    #[must_use]
    pub const fn include_payload(&self) -> bool {
        self.include_payload
    }

    /// Whether client address, session, and user are captured for logging.
    #[must_use]
    pub const fn include_client_info(&self) -> bool {
        self.include_client_info
    }

    /// Maximum number of payload bytes written to the log.
    #[must_use]
    pub const fn max_payload_length(&self) -> usize {
        self.max_payload_length
    }
}

impl std::fmt::Debug for LogPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogPolicy")
            .field("enabled", &self.enabled)
            .field("http_log_enabled", &self.http_log_enabled)
            .field("exclude_urls", &self.exclude_urls)
            .finish_non_exhaustive()
    }
}
