//! # Folio Config
//!
//! Configuration management for the Folio demo service.
//! Layered loading: `config/default.toml` → `config/{environment}.toml` →
//! `config/local.toml` → `FOLIO`-prefixed environment variables.

pub mod app_config;
pub mod loader;

pub use app_config::*;
pub use loader::*;
