//! Financial calculations: income tax, loan amortization and rental regimes.
//!
//! Every calculation is a pure function of its inputs and configuration.

pub mod amortization;
pub mod brackets;
pub mod common;
pub mod decote;
pub mod family_quotient;
pub mod income_tax;
pub mod regime;

pub use amortization::{LoanAmortizationEngine, yearly_interest};
pub use income_tax::{IncomeTaxBreakdown, IncomeTaxEngine, compute_tax};
pub use regime::{RegimeComparator, compare_regimes};
