//! CLI command implementations.

pub mod cluster;
pub mod init;
pub mod report;
pub mod snapshot;
pub mod village;
