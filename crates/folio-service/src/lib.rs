//! # Folio Service
//!
//! Business logic service layer for the Folio demo service.

pub mod author_service;
pub mod dto;

mod r#impl;

pub use author_service::*;
pub use dto::*;
pub use r#impl::*;
