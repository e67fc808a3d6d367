pub mod calculations;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use config::{CalculationConfig, IncomeTaxConfig, RegimeConfig};
pub use db::repository::{RepositoryError, SnapshotRepository};
pub use error::ValidationError;
pub use models::*;
