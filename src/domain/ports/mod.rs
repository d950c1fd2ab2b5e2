//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - VillageRepository: storage of the village set
//! - RiskOracle: per-report risk classification
//! - AdvisoryOracle: per-cluster coordinated advice
//!
//! These traits keep ingestion and clustering independent of storage media
//! and network services.

pub mod oracle;
pub mod village_repository;

pub use oracle::{AdvisoryOracle, RiskOracle};
pub use village_repository::VillageRepository;
