//! Adapters for storage and oracle backends.

pub mod memory;
pub mod oracles;
pub mod snapshot;
pub mod sqlite;

pub use memory::InMemoryVillageRepository;
pub use oracles::{build_oracles, stub_oracles, OraclePair};
pub use snapshot::{load_snapshot, save_snapshot, seed_villages, SnapshotError};
pub use sqlite::SqliteVillageRepository;
