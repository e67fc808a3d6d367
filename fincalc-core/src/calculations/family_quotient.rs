//! Family quotient: taxing income per household part.
//!
//! The household's taxable income is divided by its number of parts, the
//! bracket table is applied to one part, and the result is scaled back up.
//! The benefit of that split is capped against a flat reference tax at the
//! configured quotient reference rate (30%):
//!
//! ```text
//! raw_tax     = total_tax(T / parts) * parts
//! basic_tax   = T * 30%                       (single unbounded bracket)
//! benefit     = basic_tax - raw_tax
//! max_benefit = 1678 * (parts - 1) * 2
//! tax         = benefit > max_benefit ? basic_tax - max_benefit : raw_tax
//! ```
//!
//! The reference is a flat 30% bracket rather than the progressive table.
//! This is the rule the figures have always been produced with and is kept
//! as-is; see DESIGN.md for the known limitation. With a single part there
//! is nothing to split and the step returns the bracket tax unchanged.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::brackets::{tax_for_bracket, total_tax};
use crate::{HouseholdSituation, IncomeTaxConfig, TaxBracket};

/// Number of household parts: 1 single, 2 couple, 2 + ½ per child for families.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::HouseholdSituation;
/// use fincalc_core::calculations::family_quotient::parts;
///
/// assert_eq!(parts(HouseholdSituation::Single, 3), dec!(1));
/// assert_eq!(parts(HouseholdSituation::Family, 3), dec!(3.5));
/// ```
pub fn parts(
    situation: HouseholdSituation,
    children: u32,
) -> Decimal {
    match situation {
        HouseholdSituation::Single => Decimal::ONE,
        HouseholdSituation::Couple => Decimal::TWO,
        HouseholdSituation::Family => Decimal::TWO + dec!(0.5) * Decimal::from(children),
    }
}

/// Intermediate figures of the family quotient step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotientOutcome {
    pub parts: Decimal,
    pub raw_tax: Decimal,
    pub basic_tax: Decimal,
    pub family_benefit: Decimal,
    pub max_benefit: Decimal,
    /// Whether the benefit cap replaced the per-part tax.
    pub capped: bool,
    /// Tax before decote.
    pub tax: Decimal,
}

/// Applies the family quotient and its benefit cap to `taxable_income`.
pub fn apply_family_quotient(
    taxable_income: Decimal,
    parts: Decimal,
    config: &IncomeTaxConfig,
) -> QuotientOutcome {
    let per_part_tax = total_tax(taxable_income / parts, &config.brackets);
    let raw_tax = per_part_tax * parts;

    let reference = TaxBracket::new(Decimal::ZERO, None, config.quotient_reference_rate);
    let basic_tax = tax_for_bracket(taxable_income, &reference);
    let family_benefit = basic_tax - raw_tax;
    let max_benefit = config.quotient_cap_per_half_part * (parts - Decimal::ONE) * Decimal::TWO;

    let capped = parts > Decimal::ONE && family_benefit > max_benefit;
    let tax = if capped {
        debug!(
            family_benefit = %family_benefit,
            max_benefit = %max_benefit,
            "family quotient benefit capped"
        );
        basic_tax - max_benefit
    } else {
        raw_tax
    };

    QuotientOutcome {
        parts,
        raw_tax,
        basic_tax,
        family_benefit,
        max_benefit,
        capped,
        tax,
    }
}
