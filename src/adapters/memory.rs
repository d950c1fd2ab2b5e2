//! In-memory village repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Comment, Village};
use crate::domain::ports::VillageRepository;

#[derive(Default)]
struct Store {
    villages: Vec<Village>,
    index: HashMap<String, usize>,
}

/// Village repository held entirely in memory.
///
/// Insertion order is preserved; replacing a village keeps its slot.
#[derive(Default)]
pub struct InMemoryVillageRepository {
    store: RwLock<Store>,
}

impl InMemoryVillageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with villages.
    ///
    /// Later entries replace earlier ones with the same ID.
    pub fn with_villages(villages: impl IntoIterator<Item = Village>) -> Self {
        let mut store = Store::default();
        for village in villages {
            store.put(village);
        }
        Self {
            store: RwLock::new(store),
        }
    }
}

impl Store {
    fn put(&mut self, village: Village) {
        match self.index.get(&village.id) {
            Some(&slot) => self.villages[slot] = village,
            None => {
                self.index.insert(village.id.clone(), self.villages.len());
                self.villages.push(village);
            }
        }
    }
}

#[async_trait]
impl VillageRepository for InMemoryVillageRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Village>> {
        let store = self.store.read().await;
        Ok(store.index.get(id).map(|&slot| store.villages[slot].clone()))
    }

    async fn upsert(&self, village: &Village) -> DomainResult<()> {
        self.store.write().await.put(village.clone());
        Ok(())
    }

    async fn all(&self) -> DomainResult<Vec<Village>> {
        Ok(self.store.read().await.villages.clone())
    }

    async fn add_comment(&self, village_id: &str, comment: &Comment) -> DomainResult<bool> {
        let mut store = self.store.write().await;
        let Some(&slot) = store.index.get(village_id) else {
            return Ok(false);
        };
        store.villages[slot].add_comment(comment.clone());
        Ok(true)
    }

    async fn count(&self) -> DomainResult<usize> {
        Ok(self.store.read().await.villages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Coordinates, RiskLevel};

    fn village(id: &str) -> Village {
        Village::new(id, id, "Krishna", Coordinates::new(16.0, 81.0), 1000)
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let repo = InMemoryVillageRepository::new();
        repo.upsert(&village("a")).await.unwrap();
        assert!(repo.get("a").await.unwrap().is_some());
        assert!(repo.get("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_keeps_insertion_order() {
        let repo = InMemoryVillageRepository::new();
        for id in ["a", "b", "c"] {
            repo.upsert(&village(id)).await.unwrap();
        }
        repo.upsert(&village("a").with_status(RiskLevel::Red)).await.unwrap();

        let all = repo.all().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(all[0].status, RiskLevel::Red);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_add_comment() {
        let repo = InMemoryVillageRepository::with_villages([village("a")]);
        assert!(repo.add_comment("a", &Comment::new("asha", "boil water")).await.unwrap());
        assert!(!repo.add_comment("zzz", &Comment::new("asha", "lost")).await.unwrap());
        assert_eq!(repo.get("a").await.unwrap().unwrap().comments.len(), 1);
    }
}
