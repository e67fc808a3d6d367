//! Decote: rebate for households whose tax is close to zero.
//!
//! Only the single-person threshold exists; couples and families use the
//! same figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::floor_at_zero;
use crate::IncomeTaxConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoteOutcome {
    pub decote: Decimal,
    pub tax: Decimal,
    pub applied: bool,
}

/// Applies the decote to a pre-decote tax amount.
///
/// ```text
/// tax <= 1840:  decote = max(0, 833 - tax * 45.25%);  tax = max(0, tax - decote)
/// tax >  1840:  unchanged
/// ```
pub fn apply_decote(
    tax: Decimal,
    config: &IncomeTaxConfig,
) -> DecoteOutcome {
    if tax > config.decote_threshold {
        return DecoteOutcome {
            decote: Decimal::ZERO,
            tax,
            applied: false,
        };
    }

    let decote = floor_at_zero(config.decote_base - tax * config.decote_rate);
    DecoteOutcome {
        decote,
        tax: floor_at_zero(tax - decote),
        applied: true,
    }
}
