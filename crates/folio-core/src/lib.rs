//! # Folio Core
//!
//! Core types and error definitions for the Folio demo service.
//! This crate provides the foundational abstractions shared by the
//! repository, service, and REST layers.

pub mod domain;
pub mod error;
pub mod result;

pub use domain::*;
pub use error::*;
pub use result::*;
