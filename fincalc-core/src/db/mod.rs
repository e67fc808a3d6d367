pub mod memory;
pub mod repository;

pub use memory::InMemorySnapshotRepository;
pub use repository::{RepositoryError, SnapshotRepository};
