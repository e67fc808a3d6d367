use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::HouseholdSituation;
use crate::ValidationError;
use crate::error::ensure_non_negative;

/// Yearly income figures for one tax household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub salary: Decimal,
    pub rental_income_gross: Decimal,
    pub rental_charges: Decimal,
    /// Contributions paid into a PER retirement savings plan.
    pub per_contribution: Decimal,
    pub child_count: u32,
    pub situation: HouseholdSituation,
}

impl FinancialProfile {
    /// Rental income minus rental charges. Negative when charges exceed income.
    pub fn rental_net(&self) -> Decimal {
        self.rental_income_gross - self.rental_charges
    }

    /// Rejects negative monetary fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative("salary", self.salary)?;
        ensure_non_negative("rental_income_gross", self.rental_income_gross)?;
        ensure_non_negative("rental_charges", self.rental_charges)?;
        ensure_non_negative("per_contribution", self.per_contribution)?;
        Ok(())
    }
}
