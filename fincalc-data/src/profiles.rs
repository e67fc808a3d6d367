//! CSV loader for financial profiles.
//!
//! | Column | Required | Type | Notes |
//! |---------------------|----------|---------|------------------------------------|
//! | `salary` | yes | decimal | |
//! | `rental_income_gross` | no | decimal | defaults to 0 |
//! | `rental_charges` | no | decimal | defaults to 0 |
//! | `per_contribution` | no | decimal | defaults to 0 |
//! | `child_count` | no | integer | defaults to 0 |
//! | `situation` | yes | string | `single`, `couple` (`pacs`), `family` |

use fincalc_core::{FinancialProfile, HouseholdSituation, ValidationError};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ProfileRow {
    salary: Decimal,
    rental_income_gross: Option<Decimal>,
    rental_charges: Option<Decimal>,
    per_contribution: Option<Decimal>,
    child_count: Option<u32>,
    situation: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read profile file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognised household situation '{value}' on row {row}")]
    InvalidSituation { value: String, row: usize },

    #[error("invalid profile on row {row}: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

fn convert_row(
    row: ProfileRow,
    row_number: usize,
) -> Result<FinancialProfile, ProfileLoadError> {
    let situation = HouseholdSituation::parse(&row.situation).ok_or_else(|| {
        ProfileLoadError::InvalidSituation {
            value: row.situation.clone(),
            row: row_number,
        }
    })?;

    let profile = FinancialProfile {
        salary: row.salary,
        rental_income_gross: row.rental_income_gross.unwrap_or_default(),
        rental_charges: row.rental_charges.unwrap_or_default(),
        per_contribution: row.per_contribution.unwrap_or_default(),
        child_count: row.child_count.unwrap_or_default(),
        situation,
    };

    profile.validate().map_err(|source| ProfileLoadError::Invalid {
        row: row_number,
        source,
    })?;

    Ok(profile)
}

/// Parse CSV text and return profiles in file order.
pub fn load_from_str(input: &str) -> Result<Vec<FinancialProfile>, ProfileLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<ProfileRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

pub fn load_from_file(path: &std::path::Path) -> Result<Vec<FinancialProfile>, ProfileLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}
