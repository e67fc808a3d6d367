//! CSV loader for loan records.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Whitespace
//! around values is trimmed.
//!
//! | Column | Required | Type | Notes |
//! |-------------------------|----------|------------|--------------------------------------------|
//! | `id` | yes | string | unique per file |
//! | `name` | yes | string | |
//! | `amount` | yes | decimal | borrowed amount, > 0 |
//! | `annual_interest_rate` | yes | decimal | percent, e.g. `3.2` |
//! | `annual_insurance_rate` | no | decimal | percent; empty for none |
//! | `start_date` | yes | date | `YYYY-MM-DD` |
//! | `end_date` | yes | date | `YYYY-MM-DD` |
//! | `repayment_type` | yes | string | `amortizing`, `interest_only` (`in_fine`) |
//! | `amortization_profile` | no | string | `linear_principal`, `constant_annuity` (default) |
//! | `monthly_payment` | no | decimal | computed when empty |
//!
//! ### Example
//!
//! ```csv
//! id,name,amount,annual_interest_rate,start_date,end_date,repayment_type,amortization_profile
//! l1,Studio,120000,3,2020-01-01,2030-01-01,interest_only,
//! l2,Flat,100000,2.4,2020-01-01,2040-01-01,amortizing,linear_principal
//! ```

use chrono::NaiveDate;
use fincalc_core::{AmortizationProfile, Loan, RepaymentType, ValidationError};
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LoanRow {
    id: String,
    name: String,
    amount: Decimal,
    annual_interest_rate: Decimal,
    annual_insurance_rate: Option<Decimal>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    repayment_type: String,
    amortization_profile: Option<String>,
    monthly_payment: Option<Decimal>,
}

/// Errors that can occur while loading loan records.
#[derive(Debug, thiserror::Error)]
pub enum LoanLoadError {
    /// The CSV structure is invalid or a cell has the wrong type.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// The file could not be read.
    #[error("cannot read loan file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognised repayment type '{value}' on row {row}")]
    InvalidRepaymentType { value: String, row: usize },

    #[error("unrecognised amortization profile '{value}' on row {row}")]
    InvalidAmortizationProfile { value: String, row: usize },

    /// The row parsed but describes an invalid loan.
    #[error("invalid loan on row {row}: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

/// Convert a single CSV row into a Loan.
///
/// row_number is 1-based (header excluded).
fn convert_row(
    row: LoanRow,
    row_number: usize,
) -> Result<Loan, LoanLoadError> {
    let repayment_type = RepaymentType::parse(&row.repayment_type).ok_or_else(|| {
        LoanLoadError::InvalidRepaymentType {
            value: row.repayment_type.clone(),
            row: row_number,
        }
    })?;

    let amortization_profile = match row.amortization_profile.as_deref() {
        None | Some("") => AmortizationProfile::default(),
        Some(code) => AmortizationProfile::parse(code).ok_or_else(|| {
            LoanLoadError::InvalidAmortizationProfile {
                value: code.to_string(),
                row: row_number,
            }
        })?,
    };

    let loan = Loan {
        id: row.id,
        name: row.name,
        amount: row.amount,
        annual_interest_rate: row.annual_interest_rate,
        annual_insurance_rate: row.annual_insurance_rate,
        start_date: row.start_date,
        end_date: row.end_date,
        repayment_type,
        amortization_profile,
        monthly_payment: row.monthly_payment,
    };

    loan.validate().map_err(|source| LoanLoadError::Invalid {
        row: row_number,
        source,
    })?;

    Ok(loan)
}

/// Parse CSV text and return loans in file order.
///
/// # Errors
///
/// * [LoanLoadError::Parse] when the CSV is malformed or a required cell is missing.
/// * [LoanLoadError::InvalidRepaymentType] / [LoanLoadError::InvalidAmortizationProfile]
///   for unknown codes.
/// * [LoanLoadError::Invalid] when a row fails loan validation.
pub fn load_from_str(input: &str) -> Result<Vec<Loan>, LoanLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<LoanRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Reads a file from disk and delegates to [load_from_str].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<Loan>, LoanLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}
