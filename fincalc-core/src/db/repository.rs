use async_trait::async_trait;
use thiserror::Error;

use crate::models::TaxSnapshot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

/// Storage for computed tax snapshots, keyed by user and fiscal year.
///
/// The calculation core never calls this itself; the surrounding application
/// persists the [`TaxSnapshot`] it builds from a computed result.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Inserts or replaces the snapshot for `(user_id, fiscal_year)`.
    async fn save_snapshot(&self, snapshot: &TaxSnapshot) -> Result<(), RepositoryError>;

    async fn get_snapshot(
        &self,
        user_id: &str,
        fiscal_year: i32,
    ) -> Result<TaxSnapshot, RepositoryError>;

    /// All snapshots of a user, ordered by fiscal year.
    async fn list_snapshots(&self, user_id: &str) -> Result<Vec<TaxSnapshot>, RepositoryError>;

    async fn delete_snapshot(&self, user_id: &str, fiscal_year: i32) -> Result<(), RepositoryError>;
}
