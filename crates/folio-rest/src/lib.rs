//! # Folio REST
//!
//! REST API layer using Axum for the Folio demo service.
//! Provides the author lookup endpoints, health checks, and the unified
//! request-observability layer.

pub mod controllers;
pub mod observability;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
