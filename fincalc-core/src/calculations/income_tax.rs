//! Personal income tax for one household.
//!
//! The engine chains the PER deduction, rental income netting, the family
//! quotient and the decote:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | PER deduction: min(contribution × 90%, salary × 10%) |
//! | 2    | Rental net: rental income − rental charges (may be negative) |
//! | 3    | Taxable income: salary − PER deduction + rental net |
//! | 4    | Family quotient with benefit cap |
//! | 5    | Decote |
//! | 6    | Effective rate: tax / taxable income, whole percent |
//!
//! Intermediate steps keep full precision; only the returned [`TaxResult`]
//! is rounded to whole units.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::{FinancialProfile, HouseholdSituation, IncomeTaxConfig};
//! use fincalc_core::calculations::IncomeTaxEngine;
//!
//! let config = IncomeTaxConfig::year_2025();
//! let engine = IncomeTaxEngine::new(&config);
//!
//! let profile = FinancialProfile {
//!     salary: dec!(60000),
//!     rental_income_gross: dec!(12000),
//!     rental_charges: dec!(4000),
//!     per_contribution: dec!(0),
//!     child_count: 0,
//!     situation: HouseholdSituation::Single,
//! };
//!
//! let result = engine.compute(&profile).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(68000));
//! assert_eq!(result.tax, dec!(13686));
//! assert_eq!(result.effective_rate, dec!(20));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::common::round_to_unit;
use super::decote::{DecoteOutcome, apply_decote};
use super::family_quotient::{QuotientOutcome, apply_family_quotient, parts};
use crate::{FinancialProfile, HouseholdSituation, IncomeTaxConfig, TaxResult, ValidationError};

/// Every intermediate figure of one income tax computation, unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxBreakdown {
    pub per_deduction: Decimal,
    pub rental_net: Decimal,
    pub taxable_income: Decimal,
    pub quotient: QuotientOutcome,
    pub decote: DecoteOutcome,
}

impl IncomeTaxBreakdown {
    /// Final tax after quotient and decote.
    pub fn tax(&self) -> Decimal {
        self.decote.tax
    }

    /// Rounds the breakdown into the public result.
    pub fn to_result(&self) -> TaxResult {
        let effective_rate = if self.taxable_income > Decimal::ZERO {
            round_to_unit(self.tax() / self.taxable_income * Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };

        TaxResult {
            tax: round_to_unit(self.tax()),
            taxable_income: round_to_unit(self.taxable_income),
            effective_rate,
        }
    }
}

/// Progressive income tax calculator bound to one configuration.
#[derive(Debug, Clone)]
pub struct IncomeTaxEngine<'a> {
    config: &'a IncomeTaxConfig,
}

impl<'a> IncomeTaxEngine<'a> {
    pub fn new(config: &'a IncomeTaxConfig) -> Self {
        Self { config }
    }

    /// Computes the rounded tax result for `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the profile has a negative amount or
    /// the configuration is invalid.
    pub fn compute(
        &self,
        profile: &FinancialProfile,
    ) -> Result<TaxResult, ValidationError> {
        Ok(self.breakdown(profile)?.to_result())
    }

    /// Computes every intermediate figure for `profile` without rounding.
    pub fn breakdown(
        &self,
        profile: &FinancialProfile,
    ) -> Result<IncomeTaxBreakdown, ValidationError> {
        self.config.validate()?;
        profile.validate()?;

        // Step 1: PER deduction
        let per_deduction = self.per_deduction(profile.per_contribution, profile.salary);

        // Step 2: rental netting
        let rental_net = profile.rental_net();

        // Step 3: taxable income
        let taxable_income = self.taxable_income(profile.salary, per_deduction, rental_net)?;

        // Step 4: family quotient
        let household_parts = parts(profile.situation, profile.child_count);
        let quotient = apply_family_quotient(taxable_income, household_parts, self.config);

        // Step 5: decote
        let decote = apply_decote(quotient.tax, self.config);

        debug!(
            taxable_income = %taxable_income,
            parts = %household_parts,
            quotient_tax = %quotient.tax,
            decote = %decote.decote,
            tax = %decote.tax,
            "income tax computed"
        );

        Ok(IncomeTaxBreakdown {
            per_deduction,
            rental_net,
            taxable_income,
            quotient,
            decote,
        })
    }

    /// Deductible PER contributions, capped at a share of salary.
    fn per_deduction(
        &self,
        per_contribution: Decimal,
        salary: Decimal,
    ) -> Decimal {
        let deductible = per_contribution * self.config.per_deduction_rate;
        let ceiling = salary * self.config.per_salary_cap_rate;
        deductible.min(ceiling)
    }

    fn taxable_income(
        &self,
        salary: Decimal,
        per_deduction: Decimal,
        rental_net: Decimal,
    ) -> Result<Decimal, ValidationError> {
        let taxable = (salary - per_deduction)
            .checked_add(rental_net)
            .ok_or(ValidationError::ArithmeticOverflow {
                field: "taxable_income",
            })?;
        if taxable < Decimal::ZERO {
            warn!(
                salary = %salary,
                rental_net = %rental_net,
                taxable = %taxable,
                "taxable income is negative; no tax due"
            );
        }
        Ok(taxable)
    }
}

/// Computes income tax with the 2025 configuration.
///
/// Positional convenience over [`IncomeTaxEngine::compute`].
pub fn compute_tax(
    salary: Decimal,
    rental_income: Decimal,
    rental_charges: Decimal,
    per_contribution: Decimal,
    children: u32,
    situation: HouseholdSituation,
) -> Result<TaxResult, ValidationError> {
    let config = IncomeTaxConfig::year_2025();
    let profile = FinancialProfile {
        salary,
        rental_income_gross: rental_income,
        rental_charges,
        per_contribution,
        child_count: children,
        situation,
    };
    IncomeTaxEngine::new(&config).compute(&profile)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::brackets::total_tax;

    fn single_profile() -> FinancialProfile {
        FinancialProfile {
            salary: dec!(60000),
            rental_income_gross: dec!(12000),
            rental_charges: dec!(4000),
            per_contribution: dec!(0),
            child_count: 0,
            situation: HouseholdSituation::Single,
        }
    }

    // =========================================================================
    // per_deduction tests
    // =========================================================================

    #[test]
    fn per_deduction_uses_ninety_percent_of_contribution() {
        let config = IncomeTaxConfig::year_2025();
        let engine = IncomeTaxEngine::new(&config);

        assert_eq!(engine.per_deduction(dec!(3000), dec!(60000)), dec!(2700));
    }

    #[test]
    fn per_deduction_capped_at_ten_percent_of_salary() {
        let config = IncomeTaxConfig::year_2025();
        let engine = IncomeTaxEngine::new(&config);

        assert_eq!(engine.per_deduction(dec!(10000), dec!(60000)), dec!(6000));
    }

    // =========================================================================
    // compute tests
    // =========================================================================

    #[test]
    fn single_scenario_matches_bracket_sum() {
        let config = IncomeTaxConfig::year_2025();
        let engine = IncomeTaxEngine::new(&config);

        let breakdown = engine.breakdown(&single_profile()).unwrap();

        assert_eq!(breakdown.taxable_income, dec!(68000));
        assert_eq!(breakdown.quotient.parts, dec!(1));
        assert_eq!(breakdown.tax(), total_tax(dec!(68000), &config.brackets));
        assert!(!breakdown.decote.applied);
        assert_eq!(breakdown.decote.decote, dec!(0));
    }

    #[test]
    fn single_scenario_result_is_rounded() {
        let config = IncomeTaxConfig::year_2025();

        let result = IncomeTaxEngine::new(&config).compute(&single_profile()).unwrap();

        assert_eq!(
            result,
            TaxResult {
                tax: dec!(13686),
                taxable_income: dec!(68000),
                effective_rate: dec!(20),
            }
        );
    }

    #[test]
    fn per_contribution_lowers_taxable_income() {
        let config = IncomeTaxConfig::year_2025();
        let mut profile = single_profile();
        profile.per_contribution = dec!(2000);

        let breakdown = IncomeTaxEngine::new(&config).breakdown(&profile).unwrap();

        assert_eq!(breakdown.per_deduction, dec!(1800));
        assert_eq!(breakdown.taxable_income, dec!(66200));
    }

    #[test]
    fn low_income_gets_decote() {
        let config = IncomeTaxConfig::year_2025();
        let mut profile = single_profile();
        profile.salary = dec!(20000);
        profile.rental_income_gross = dec!(0);
        profile.rental_charges = dec!(0);

        let breakdown = IncomeTaxEngine::new(&config).breakdown(&profile).unwrap();

        // (20000 - 11295) * 0.11 = 957.55; decote 833 - 433.29... = 399.70...
        assert!(breakdown.decote.applied);
        assert_eq!(breakdown.quotient.tax, dec!(957.55));
        assert_eq!(breakdown.tax(), dec!(957.55) - (dec!(833) - dec!(957.55) * dec!(0.4525)));
        assert_eq!(breakdown.to_result().tax, dec!(558));
    }

    #[test]
    fn rental_deficit_can_make_taxable_income_negative() {
        let config = IncomeTaxConfig::year_2025();
        let mut profile = single_profile();
        profile.salary = dec!(5000);
        profile.rental_income_gross = dec!(1000);
        profile.rental_charges = dec!(9000);

        let result = IncomeTaxEngine::new(&config).compute(&profile).unwrap();

        assert_eq!(result.taxable_income, dec!(-3000));
        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn negative_salary_is_rejected() {
        let config = IncomeTaxConfig::year_2025();
        let mut profile = single_profile();
        profile.salary = dec!(-1);

        let err = IncomeTaxEngine::new(&config).compute(&profile).unwrap_err();

        assert_eq!(err.field(), "salary");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = IncomeTaxConfig::year_2025();
        config.brackets.clear();

        let result = IncomeTaxEngine::new(&config).compute(&single_profile());

        assert!(matches!(result, Err(ValidationError::InvalidBrackets(_))));
    }

    #[test]
    fn compute_tax_positional_matches_engine() {
        let result = compute_tax(
            dec!(60000),
            dec!(12000),
            dec!(4000),
            dec!(0),
            0,
            HouseholdSituation::Single,
        )
        .unwrap();

        assert_eq!(result.tax, dec!(13686));
    }

    #[test]
    fn income_beyond_decimal_range_is_rejected() {
        let result = compute_tax(
            Decimal::MAX,
            Decimal::MAX,
            dec!(0),
            dec!(0),
            0,
            HouseholdSituation::Single,
        );

        assert_eq!(
            result,
            Err(ValidationError::ArithmeticOverflow {
                field: "taxable_income",
            })
        );
    }

    #[test]
    fn family_uses_more_parts_than_couple() {
        let config = IncomeTaxConfig::year_2025();
        let engine = IncomeTaxEngine::new(&config);
        let mut profile = single_profile();
        profile.situation = HouseholdSituation::Family;
        profile.child_count = 2;

        let breakdown = engine.breakdown(&profile).unwrap();

        assert_eq!(breakdown.quotient.parts, dec!(3));
        assert_eq!(breakdown.quotient.max_benefit, dec!(6712));
    }
}
