//! Loan amortization: per-loan month replay and the yearly interest table.

mod engine;
mod schedule;

pub use engine::{LoanAmortizationEngine, yearly_interest};
pub use schedule::{
    Installment, InstallmentReplay, LoanYearSlice, annuity_payment, build_schedule,
    closed_form_total_interest, replay_through_year,
};
