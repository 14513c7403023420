//! # Folio Repository
//!
//! SQLx-backed data access for the Folio demo service.

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
