//! Yearly interest table across a portfolio of loans.
//!
//! For every requested year the table lists each loan with installments in
//! that year and the interest it paid. Each loan's month-by-month schedule
//! is replayed once per call and cached by `(loan_id, year)`; the figures
//! are identical to replaying the loan from its start for every year.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use fincalc_core::{AmortizationProfile, Loan, RepaymentType};
//! use fincalc_core::calculations::amortization::yearly_interest;
//!
//! let loan = Loan {
//!     id: "in-fine".to_string(),
//!     name: "Studio".to_string(),
//!     amount: dec!(120000),
//!     annual_interest_rate: dec!(3),
//!     annual_insurance_rate: None,
//!     start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
//!     end_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
//!     repayment_type: RepaymentType::InterestOnly,
//!     amortization_profile: AmortizationProfile::default(),
//!     monthly_payment: None,
//! };
//!
//! let rows = yearly_interest(&[loan], 2024, 2025).unwrap();
//!
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].total_interest, dec!(3600));
//! ```

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::debug;

use super::schedule::{LoanYearSlice, build_schedule};
use crate::{Loan, LoanYearDetail, ValidationError, YearlyInterestRow};

/// Per-call cache of replayed loan years.
#[derive(Debug, Default)]
struct ScheduleCache {
    slices: HashMap<(String, i32), LoanYearSlice>,
    replayed: HashSet<String>,
}

impl ScheduleCache {
    fn slice(
        &mut self,
        loan: &Loan,
        year: i32,
    ) -> Result<Option<&LoanYearSlice>, ValidationError> {
        if !self.replayed.contains(&loan.id) {
            let schedule = build_schedule(loan)?;
            debug!(loan_id = %loan.id, years = schedule.len(), "loan schedule replayed");
            for (slice_year, slice) in schedule {
                self.slices.insert((loan.id.clone(), slice_year), slice);
            }
            self.replayed.insert(loan.id.clone());
        }
        Ok(self.slices.get(&(loan.id.clone(), year)))
    }
}

/// Interest table builder over a validated set of loans.
#[derive(Debug, Clone)]
pub struct LoanAmortizationEngine<'a> {
    loans: &'a [Loan],
}

impl<'a> LoanAmortizationEngine<'a> {
    /// Validates every loan and checks that loan ids are unique.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn new(loans: &'a [Loan]) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for loan in loans {
            loan.validate()?;
            if !seen.insert(loan.id.as_str()) {
                return Err(ValidationError::DuplicateLoanId(loan.id.clone()));
            }
        }
        Ok(Self { loans })
    }

    /// One row per year from `start_year` to `end_year` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidYearRange`] when `start_year` is
    /// after `end_year`.
    pub fn yearly_interest(
        &self,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<YearlyInterestRow>, ValidationError> {
        if start_year > end_year {
            return Err(ValidationError::InvalidYearRange {
                start_year,
                end_year,
            });
        }

        let mut cache = ScheduleCache::default();
        let mut rows = Vec::new();

        for year in start_year..=end_year {
            let mut details = Vec::new();
            for loan in self.loans.iter().filter(|loan| loan.is_active_in(year)) {
                let Some(slice) = cache.slice(loan, year)? else {
                    continue;
                };
                if slice.active_months == 0 {
                    continue;
                }
                details.push(LoanYearDetail {
                    loan_id: loan.id.clone(),
                    loan_name: loan.name.clone(),
                    loan_type: loan.repayment_type,
                    interest: slice.interest,
                    amount: loan.amount,
                    principal_repaid: slice.principal_repaid,
                    insurance: slice.insurance,
                    remaining_capital: slice.remaining_capital,
                });
            }

            let total_interest = details
                .iter()
                .try_fold(Decimal::ZERO, |acc, d| acc.checked_add(d.interest))
                .ok_or(ValidationError::ArithmeticOverflow {
                    field: "total_interest",
                })?;
            rows.push(YearlyInterestRow {
                year,
                total_interest,
                details,
            });
        }

        Ok(rows)
    }
}

/// Builds the yearly interest table for `loans` over an inclusive year range.
///
/// # Errors
///
/// Returns [`ValidationError`] for an invalid loan, duplicate loan ids or an
/// inverted year range.
pub fn yearly_interest(
    loans: &[Loan],
    start_year: i32,
    end_year: i32,
) -> Result<Vec<YearlyInterestRow>, ValidationError> {
    LoanAmortizationEngine::new(loans)?.yearly_interest(start_year, end_year)
}
