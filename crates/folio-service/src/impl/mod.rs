//! Service implementations.

pub mod author_service_impl;

pub use author_service_impl::*;
