//! Domain layer for villagewatch
//!
//! This module contains core business types and the ports that adapters
//! implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DomainError, DomainResult, OracleError, OracleResult};
