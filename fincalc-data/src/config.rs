//! TOML overrides for calculation parameters.
//!
//! Every table and key is optional; anything left out keeps its 2025 value.
//! Decimal values are best written as strings to keep them exact:
//!
//! ```toml
//! [income_tax]
//! decote_threshold = "1929"
//!
//! [regime]
//! single_flat_rate = "0.30"
//! ```

use std::path::Path;

use fincalc_core::{CalculationConfig, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(#[from] ValidationError),
}

/// Parses and validates a configuration document.
pub fn load_config_from_str(input: &str) -> Result<CalculationConfig, ConfigLoadError> {
    let config: CalculationConfig = toml::from_str(input)?;
    config.validate()?;
    Ok(config)
}

/// Reads a configuration file; a missing file is an error, not the defaults.
pub fn load_config(path: &Path) -> Result<CalculationConfig, ConfigLoadError> {
    let data = std::fs::read_to_string(path)?;
    load_config_from_str(&data)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(load_config_from_str("").unwrap(), CalculationConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = load_config_from_str(
            r#"
[income_tax]
decote_threshold = "1929"

[regime]
single_flat_rate = "0.30"
"#,
        )
        .unwrap();

        assert_eq!(config.income_tax.decote_threshold, dec!(1929));
        assert_eq!(config.income_tax.decote_base, dec!(833));
        assert_eq!(config.regime.single_flat_rate, dec!(0.30));
        assert_eq!(config.regime.couple_flat_rate, dec!(0.09));
    }

    #[test]
    fn bracket_table_can_be_replaced() {
        let config = load_config_from_str(
            r#"
[[income_tax.brackets]]
min = "0"
max = "10000"
rate = "0"

[[income_tax.brackets]]
min = "10001"
rate = "0.2"
"#,
        )
        .unwrap();

        assert_eq!(config.income_tax.brackets.len(), 2);
        assert_eq!(config.income_tax.brackets[1].max, None);
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let result = load_config_from_str("[regime]\nsocial_tax_rate = \"17.2\"\n");

        assert!(matches!(result, Err(ConfigLoadError::Invalid(_))));
    }

    #[test]
    fn syntax_error_is_reported() {
        assert!(matches!(
            load_config_from_str("[income_tax\n"),
            Err(ConfigLoadError::Parse(_))
        ));
    }
}
