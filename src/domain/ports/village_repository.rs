//! Village repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Comment, Village};

/// Repository interface owning the authoritative set of villages.
///
/// Writes are full-value replaces. Implementations assume a single writer
/// at a time; callers serialize mutations.
#[async_trait]
pub trait VillageRepository: Send + Sync {
    /// Get a village by ID.
    async fn get(&self, id: &str) -> DomainResult<Option<Village>>;

    /// Insert a village, or replace the stored one with the same ID.
    ///
    /// Replacing keeps the village's original position in [`all`](Self::all).
    async fn upsert(&self, village: &Village) -> DomainResult<()>;

    /// All villages in the order they were first inserted.
    async fn all(&self) -> DomainResult<Vec<Village>>;

    /// Prepend a comment to a village's comment list.
    ///
    /// Returns `false` without error when the village does not exist.
    async fn add_comment(&self, village_id: &str, comment: &Comment) -> DomainResult<bool>;

    /// Number of stored villages.
    async fn count(&self) -> DomainResult<usize> {
        Ok(self.all().await?.len())
    }
}
