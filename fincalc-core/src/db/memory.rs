use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::repository::{RepositoryError, SnapshotRepository};
use crate::models::TaxSnapshot;

/// In-process [`SnapshotRepository`], for tests and single-run tools.
#[derive(Debug, Default)]
pub struct InMemorySnapshotRepository {
    snapshots: RwLock<BTreeMap<(String, i32), TaxSnapshot>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Database("snapshot store lock poisoned".to_string())
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn save_snapshot(&self, snapshot: &TaxSnapshot) -> Result<(), RepositoryError> {
        let mut snapshots = self.snapshots.write().map_err(poisoned)?;
        snapshots.insert(
            (snapshot.user_id.clone(), snapshot.fiscal_year),
            snapshot.clone(),
        );
        Ok(())
    }

    async fn get_snapshot(
        &self,
        user_id: &str,
        fiscal_year: i32,
    ) -> Result<TaxSnapshot, RepositoryError> {
        let snapshots = self.snapshots.read().map_err(poisoned)?;
        snapshots
            .get(&(user_id.to_string(), fiscal_year))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_snapshots(&self, user_id: &str) -> Result<Vec<TaxSnapshot>, RepositoryError> {
        let snapshots = self.snapshots.read().map_err(poisoned)?;
        Ok(snapshots
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_snapshot(&self, user_id: &str, fiscal_year: i32) -> Result<(), RepositoryError> {
        let mut snapshots = self.snapshots.write().map_err(poisoned)?;
        snapshots
            .remove(&(user_id.to_string(), fiscal_year))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
