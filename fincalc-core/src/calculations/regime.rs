//! Micro-foncier versus régime réel for rental income.
//!
//! Both regimes are taxed with the social contribution rate plus a flat
//! income tax proxy (11% single, 9% couples and families), not the
//! progressive [`IncomeTaxEngine`](super::IncomeTaxEngine).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::{HouseholdSituation, RealCharges, RegimeConfig};
//! use fincalc_core::calculations::RegimeComparator;
//!
//! let config = RegimeConfig::year_2025();
//! let comparison = RegimeComparator::new(&config)
//!     .compare(dec!(15000), &RealCharges::lump_sum(dec!(3000)), HouseholdSituation::Single)
//!     .unwrap();
//!
//! assert_eq!(comparison.micro.taxable_income, dec!(10500));
//! assert_eq!(comparison.reel.taxable_income, dec!(12000));
//! assert!(comparison.is_micro_better);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use super::common::floor_at_zero;
use crate::error::ensure_non_negative;
use crate::{
    HouseholdSituation, RealCharges, RecommendedRegime, RegimeComparison, RegimeConfig,
    RegimeResult, ValidationError,
};

#[derive(Debug, Clone)]
pub struct RegimeComparator<'a> {
    config: &'a RegimeConfig,
}

impl<'a> RegimeComparator<'a> {
    pub fn new(config: &'a RegimeConfig) -> Self {
        Self { config }
    }

    /// Computes both regimes and recommends the cheaper one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for negative income or charges, or an
    /// invalid configuration.
    pub fn compare(
        &self,
        rental_income: Decimal,
        charges: &RealCharges,
        situation: HouseholdSituation,
    ) -> Result<RegimeComparison, ValidationError> {
        self.config.validate()?;
        ensure_non_negative("rental_income", rental_income)?;
        for (field, value) in charges.fields() {
            ensure_non_negative(field, value)?;
        }

        let micro = self.micro_foncier(rental_income, situation);
        let reel = self.regime_reel(rental_income, charges.total(), situation);

        let recommended = match micro.total_tax.cmp(&reel.total_tax) {
            std::cmp::Ordering::Less => RecommendedRegime::MicroFoncier,
            std::cmp::Ordering::Greater => RecommendedRegime::Reel,
            std::cmp::Ordering::Equal => RecommendedRegime::NoPreference,
        };

        debug!(
            micro_total = %micro.total_tax,
            reel_total = %reel.total_tax,
            ?recommended,
            "rental regimes compared"
        );

        Ok(RegimeComparison {
            savings: (micro.total_tax - reel.total_tax).abs(),
            is_micro_better: recommended == RecommendedRegime::MicroFoncier,
            micro_eligible: rental_income <= self.config.micro_ceiling,
            reel_deficit: floor_at_zero(charges.total() - rental_income),
            recommended,
            micro,
            reel,
        })
    }

    /// Micro-foncier: a flat deemed deduction on gross rental income.
    pub fn micro_foncier(
        &self,
        rental_income: Decimal,
        situation: HouseholdSituation,
    ) -> RegimeResult {
        let deduction = rental_income * self.config.micro_allowance_rate;
        self.taxed(rental_income, deduction, rental_income - deduction, situation)
    }

    /// Régime réel: actual charges deducted, taxable income floored at zero.
    pub fn regime_reel(
        &self,
        rental_income: Decimal,
        total_charges: Decimal,
        situation: HouseholdSituation,
    ) -> RegimeResult {
        let taxable = floor_at_zero(rental_income - total_charges);
        self.taxed(rental_income, total_charges, taxable, situation)
    }

    fn taxed(
        &self,
        gross: Decimal,
        deduction: Decimal,
        taxable: Decimal,
        situation: HouseholdSituation,
    ) -> RegimeResult {
        let social_tax = taxable * self.config.social_tax_rate;
        let income_tax = taxable * self.config.flat_rate(situation);
        let total_tax = income_tax + social_tax;
        let effective_rate = if gross.is_zero() {
            Decimal::ZERO
        } else {
            total_tax / gross * Decimal::ONE_HUNDRED
        };

        RegimeResult {
            gross_rental_income: gross,
            deduction,
            taxable_income: taxable,
            social_tax,
            income_tax,
            total_tax,
            effective_rate,
        }
    }
}

/// Compares regimes with the 2025 configuration.
pub fn compare_regimes(
    rental_income: Decimal,
    charges: &RealCharges,
    situation: HouseholdSituation,
) -> Result<RegimeComparison, ValidationError> {
    RegimeComparator::new(&RegimeConfig::year_2025()).compare(rental_income, charges, situation)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn comparator_config() -> RegimeConfig {
        RegimeConfig::year_2025()
    }

    // =========================================================================
    // micro_foncier tests
    // =========================================================================

    #[test]
    fn micro_foncier_deducts_thirty_percent() {
        let config = comparator_config();

        let result = RegimeComparator::new(&config).micro_foncier(dec!(15000), HouseholdSituation::Single);

        assert_eq!(
            result,
            RegimeResult {
                gross_rental_income: dec!(15000),
                deduction: dec!(4500),
                taxable_income: dec!(10500),
                social_tax: dec!(1806),
                income_tax: dec!(1155),
                total_tax: dec!(2961),
                effective_rate: dec!(19.74),
            }
        );
    }

    // =========================================================================
    // regime_reel tests
    // =========================================================================

    #[test]
    fn regime_reel_deducts_actual_charges() {
        let config = comparator_config();

        let result = RegimeComparator::new(&config).regime_reel(dec!(15000), dec!(3000), HouseholdSituation::Single);

        assert_eq!(result.taxable_income, dec!(12000));
        assert_eq!(result.social_tax, dec!(2064));
        assert_eq!(result.income_tax, dec!(1320));
        assert_eq!(result.total_tax, dec!(3384));
    }

    #[test]
    fn regime_reel_floors_taxable_at_zero() {
        let config = comparator_config();

        let result = RegimeComparator::new(&config).regime_reel(dec!(5000), dec!(8000), HouseholdSituation::Couple);

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn couple_uses_lower_flat_rate() {
        let config = comparator_config();

        let result = RegimeComparator::new(&config).regime_reel(dec!(10000), dec!(0), HouseholdSituation::Couple);

        assert_eq!(result.income_tax, dec!(900));
    }

    // =========================================================================
    // compare tests
    // =========================================================================

    #[test]
    fn scenario_micro_is_better() {
        let comparison =
            compare_regimes(dec!(15000), &RealCharges::lump_sum(dec!(3000)), HouseholdSituation::Single).unwrap();

        assert!(comparison.reel.total_tax > comparison.micro.total_tax);
        assert!(comparison.is_micro_better);
        assert_eq!(comparison.recommended, RecommendedRegime::MicroFoncier);
        assert_eq!(comparison.savings, dec!(423));
        assert!(comparison.micro_eligible);
        assert_eq!(comparison.reel_deficit, dec!(0));
    }

    #[test]
    fn heavy_charges_favour_reel() {
        let charges = RealCharges {
            loan_interest: dec!(4000),
            property_tax: dec!(1200),
            ..RealCharges::default()
        };

        let comparison = compare_regimes(dec!(12000), &charges, HouseholdSituation::Family).unwrap();

        assert_eq!(comparison.recommended, RecommendedRegime::Reel);
        assert!(!comparison.is_micro_better);
    }

    #[test]
    fn equal_totals_have_no_preference() {
        // charges equal to the 30% allowance
        let comparison =
            compare_regimes(dec!(10000), &RealCharges::lump_sum(dec!(3000)), HouseholdSituation::Single).unwrap();

        assert_eq!(comparison.recommended, RecommendedRegime::NoPreference);
        assert!(!comparison.is_micro_better);
        assert_eq!(comparison.savings, dec!(0));
    }

    #[test]
    fn zero_income_has_zero_effective_rate() {
        let comparison = compare_regimes(dec!(0), &RealCharges::default(), HouseholdSituation::Single).unwrap();

        assert_eq!(comparison.micro.effective_rate, dec!(0));
        assert_eq!(comparison.reel.effective_rate, dec!(0));
    }

    #[test]
    fn income_above_ceiling_is_not_micro_eligible() {
        let comparison =
            compare_regimes(dec!(15000.01), &RealCharges::default(), HouseholdSituation::Single).unwrap();

        assert!(!comparison.micro_eligible);
    }

    #[test]
    fn deficit_reported_when_charges_exceed_income() {
        let comparison =
            compare_regimes(dec!(5000), &RealCharges::lump_sum(dec!(8000)), HouseholdSituation::Single).unwrap();

        assert_eq!(comparison.reel_deficit, dec!(3000));
    }

    #[test]
    fn negative_charge_is_rejected() {
        let charges = RealCharges {
            maintenance: dec!(-10),
            ..RealCharges::default()
        };

        let err = compare_regimes(dec!(10000), &charges, HouseholdSituation::Single).unwrap_err();

        assert_eq!(err.field(), "maintenance");
    }
}
