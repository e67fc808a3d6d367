use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RepaymentType;

/// Interest paid across all loans in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyInterestRow {
    pub year: i32,
    pub total_interest: Decimal,
    /// One entry per loan with installments in `year`; empty when none are.
    pub details: Vec<LoanYearDetail>,
}

/// One loan's contribution to a [`YearlyInterestRow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanYearDetail {
    pub loan_id: String,
    pub loan_name: String,
    pub loan_type: RepaymentType,
    pub interest: Decimal,
    /// Initial borrowed amount of the loan.
    pub amount: Decimal,
    /// Principal repaid by installments falling in the year.
    pub principal_repaid: Decimal,
    /// Borrower insurance on the initial amount for the installments in the year.
    pub insurance: Decimal,
    /// Outstanding capital after the last installment of the year.
    pub remaining_capital: Decimal,
}
