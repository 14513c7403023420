//! Unified request-observability layer.
//!
//! Request logging happens at two wrap points with one decision point
//! between them:
//!
//! - [`HttpLogLayer`] wraps the whole router at the transport boundary. It
//!   sees every inbound request before routing, logs request-side data
//!   (method, URI, payload, client info) and total wall-clock time, but can
//!   never observe a handler's return value.
//! - [`handler_log_middleware`] wraps matched controller routes at the
//!   handler boundary. It logs the handler's inputs and response body and
//!   times the handler alone, excluding routing and the outer middleware
//!   stack.
//!
//! Both consume a single [`LogDecision`] computed once per request by
//! [`LogPolicy`]: path exclusion for the transport scope, the skip marker
//! for the handler scope. The decision travels in the request extensions, as
//! does the [`TimingContext`], so start and end of a request are correlated
//! by the request itself rather than by the identity of the worker polling
//! it.

pub mod formatter;
pub mod handler_log;
pub mod http_log;
pub mod policy;
pub mod registry;

pub use formatter::*;
pub use handler_log::*;
pub use http_log::*;
pub use policy::*;
pub use registry::*;

/// Name of the cookie consulted for an existing session id.
///
/// The cookie jar is only ever read here; logging must not create a session.
pub const SESSION_COOKIE: &str = "session_id";

/// Remote user identity, inserted into the request extensions by whatever
/// authentication layer a deployment composes in front of this one.
#[derive(Debug, Clone)]
pub struct RemoteUser(pub String);
