use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FinancialProfile;

/// Outcome of the income tax engine, rounded to whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub tax: Decimal,
    pub taxable_income: Decimal,
    /// Whole percentage of taxable income; 0 when taxable income is not positive.
    pub effective_rate: Decimal,
}

/// Computed tax figures stored per user and fiscal year by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSnapshot {
    pub user_id: String,
    pub fiscal_year: i32,
    pub salary: Decimal,
    pub rental_net: Decimal,
    pub computed_tax: Decimal,
}

impl TaxSnapshot {
    pub fn from_result(
        user_id: impl Into<String>,
        fiscal_year: i32,
        profile: &FinancialProfile,
        result: &TaxResult,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            fiscal_year,
            salary: profile.salary,
            rental_net: profile.rental_net(),
            computed_tax: result.tax,
        }
    }
}
