//! Rates, thresholds and tables driving the calculations.
//!
//! Every calculator takes its parameters from one of these structs rather
//! than hard-coding them, so a new fiscal year only needs a new config.
//! [`IncomeTaxConfig::year_2025`] and [`RegimeConfig::year_2025`] carry the
//! figures currently in force and back the `Default` impls.
//!
//! # Example
//!
//! ```
//! use fincalc_core::{CalculationConfig, IncomeTaxConfig};
//! use rust_decimal_macros::dec;
//!
//! let config = CalculationConfig::default();
//! assert_eq!(config.income_tax.decote_threshold, dec!(1840));
//! assert!(config.validate().is_ok());
//!
//! let mut custom = IncomeTaxConfig::year_2025();
//! custom.decote_rate = dec!(1.5);
//! assert!(custom.validate().is_err());
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_fraction, ensure_non_negative};
use crate::{HouseholdSituation, TaxBracket, ValidationError, validate_brackets};

/// Parameters of the progressive income tax engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeTaxConfig {
    /// Progressive bracket table, sorted ascending.
    pub brackets: Vec<TaxBracket>,

    /// Share of PER contributions that is deductible (90%).
    pub per_deduction_rate: Decimal,

    /// PER deduction ceiling as a share of salary (10%).
    pub per_salary_cap_rate: Decimal,

    /// Flat rate of the reference tax the family quotient benefit is
    /// measured against (30%).
    pub quotient_reference_rate: Decimal,

    /// Maximum quotient benefit per additional half part (1678).
    pub quotient_cap_per_half_part: Decimal,

    /// Tax at or below which the decote applies (1840, single-person figure).
    pub decote_threshold: Decimal,

    /// Fixed amount of the decote formula (833).
    pub decote_base: Decimal,

    /// Share of tax subtracted from the decote base (45.25%).
    pub decote_rate: Decimal,
}

impl IncomeTaxConfig {
    pub fn year_2025() -> Self {
        Self {
            brackets: TaxBracket::table_2025(),
            per_deduction_rate: dec!(0.9),
            per_salary_cap_rate: dec!(0.10),
            quotient_reference_rate: dec!(0.30),
            quotient_cap_per_half_part: dec!(1678),
            decote_threshold: dec!(1840),
            decote_base: dec!(833),
            decote_rate: dec!(0.4525),
        }
    }

    /// Validates the bracket table and every factor.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBrackets`] for a malformed table and
    /// [`ValidationError::InvalidConfig`] or [`ValidationError::Negative`]
    /// for a factor outside its range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_brackets(&self.brackets)?;
        ensure_fraction("per_deduction_rate", self.per_deduction_rate)?;
        ensure_fraction("per_salary_cap_rate", self.per_salary_cap_rate)?;
        ensure_fraction("quotient_reference_rate", self.quotient_reference_rate)?;
        ensure_fraction("decote_rate", self.decote_rate)?;
        ensure_non_negative("quotient_cap_per_half_part", self.quotient_cap_per_half_part)?;
        ensure_non_negative("decote_threshold", self.decote_threshold)?;
        ensure_non_negative("decote_base", self.decote_base)?;
        Ok(())
    }
}

impl Default for IncomeTaxConfig {
    fn default() -> Self {
        Self::year_2025()
    }
}

/// Parameters of the rental income regime comparison.
///
/// The income tax here is a flat proxy rate per household, not the
/// progressive engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Deemed deduction of the micro-foncier regime (30%).
    pub micro_allowance_rate: Decimal,

    /// Social contributions on rental income (17.2%).
    pub social_tax_rate: Decimal,

    /// Flat income tax proxy for single filers (11%).
    pub single_flat_rate: Decimal,

    /// Flat income tax proxy for couples and families (9%).
    pub couple_flat_rate: Decimal,

    /// Gross rental income ceiling of the micro-foncier regime (15000).
    pub micro_ceiling: Decimal,
}

impl RegimeConfig {
    pub fn year_2025() -> Self {
        Self {
            micro_allowance_rate: dec!(0.30),
            social_tax_rate: dec!(0.172),
            single_flat_rate: dec!(0.11),
            couple_flat_rate: dec!(0.09),
            micro_ceiling: dec!(15000),
        }
    }

    /// Flat income tax rate applied to taxable rental income.
    pub fn flat_rate(
        &self,
        situation: HouseholdSituation,
    ) -> Decimal {
        if situation.is_single() {
            self.single_flat_rate
        } else {
            self.couple_flat_rate
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_fraction("micro_allowance_rate", self.micro_allowance_rate)?;
        ensure_fraction("social_tax_rate", self.social_tax_rate)?;
        ensure_fraction("single_flat_rate", self.single_flat_rate)?;
        ensure_fraction("couple_flat_rate", self.couple_flat_rate)?;
        ensure_non_negative("micro_ceiling", self.micro_ceiling)?;
        Ok(())
    }
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self::year_2025()
    }
}

/// All calculation parameters, as loaded from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    pub income_tax: IncomeTaxConfig,
    pub regime: RegimeConfig,
}

impl CalculationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.income_tax.validate()?;
        self.regime.validate()
    }
}
