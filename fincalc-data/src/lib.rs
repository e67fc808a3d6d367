//! Input loading for the financial calculation core.
//!
//! Loans and financial profiles arrive as CSV exports from the surrounding
//! application; calculation parameters can be overridden with a TOML file.

pub mod config;
pub mod loans;
pub mod profiles;

pub use config::{ConfigLoadError, load_config, load_config_from_str};
pub use loans::LoanLoadError;
pub use profiles::ProfileLoadError;
