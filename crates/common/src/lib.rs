//! Catalog Common Library
//!
//! Product fixture model and the REST client that resets and seeds the
//! catalog before each scenario.

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use client::{LoadSummary, ProductClient};
pub use error::{Error, Result};
pub use types::*;
