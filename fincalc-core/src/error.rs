//! Validation errors shared by every calculation in the crate.
//!
//! Inputs are never silently clamped: a negative amount, a rate outside
//! `[0, 100]` or a loan that does not span at least one month is rejected
//! with a [`ValidationError`] naming the offending field.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when a calculation input or configuration is invalid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A monetary amount or count was negative.
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    /// A percentage rate fell outside `[0, 100]`.
    #[error("{field} must be between 0 and 100, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    /// An amount that must be strictly positive was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveAmount { field: &'static str, value: Decimal },

    /// A loan's end date does not fall at least one month after its start.
    #[error("{field} must span at least one month (start {start}, end {end})")]
    NonPositiveDuration {
        field: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// The requested year range is inverted.
    #[error("start year {start_year} is after end year {end_year}")]
    InvalidYearRange { start_year: i32, end_year: i32 },

    /// A bracket table is empty, unsorted, overlapping or bounded at the top.
    #[error("invalid bracket table: {0}")]
    InvalidBrackets(String),

    /// A configuration factor is outside its valid range.
    #[error("invalid configuration value for {field}: {value}")]
    InvalidConfig { field: &'static str, value: Decimal },

    /// Two loans in the same request share an identifier.
    #[error("duplicate loan id '{0}'")]
    DuplicateLoanId(String),

    /// The annuity factor could not be represented for this rate and term.
    #[error("{field} produces an annuity factor that overflows over {months} months")]
    Overflow { field: &'static str, months: u32 },

    /// A sum left the representable decimal range.
    #[error("{field} exceeds the representable decimal range")]
    ArithmeticOverflow { field: &'static str },

    /// A loan record failed validation.
    #[error("loan '{loan_id}': {source}")]
    Loan {
        loan_id: String,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Name of the field that failed validation.
    ///
    /// For loan-level errors this is the field inside the loan record.
    pub fn field(&self) -> &str {
        match self {
            Self::Negative { field, .. }
            | Self::RateOutOfRange { field, .. }
            | Self::NonPositiveAmount { field, .. }
            | Self::NonPositiveDuration { field, .. }
            | Self::InvalidConfig { field, .. }
            | Self::Overflow { field, .. }
            | Self::ArithmeticOverflow { field } => field,
            Self::InvalidYearRange { .. } => "year_range",
            Self::InvalidBrackets(_) => "brackets",
            Self::DuplicateLoanId(_) => "id",
            Self::Loan { source, .. } => source.field(),
        }
    }

    pub(crate) fn for_loan(
        loan_id: &str,
        source: ValidationError,
    ) -> Self {
        Self::Loan {
            loan_id: loan_id.to_string(),
            source: Box::new(source),
        }
    }
}

pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn ensure_percentage(
    field: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::RateOutOfRange { field, value });
    }
    Ok(())
}

pub(crate) fn ensure_fraction(
    field: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ValidationError::InvalidConfig { field, value });
    }
    Ok(())
}
