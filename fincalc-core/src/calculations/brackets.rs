//! Progressive bracket tax.
//!
//! Each bracket taxes the slice of income between its `min` and `max`:
//!
//! ```text
//! width = clamp(income - min, 0, max - min)     (unbounded when max is None)
//! tax   = width * rate
//! ```
//!
//! The total is the sum over the table in bracket order. The 2025 table has
//! one-unit gaps between brackets (`11294` / `11295`); those gaps are part of
//! the table and are reproduced as-is.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::TaxBracket;
//! use fincalc_core::calculations::brackets::total_tax;
//!
//! let table = TaxBracket::table_2025();
//!
//! assert_eq!(total_tax(dec!(11294), &table), dec!(0));
//! assert_eq!(total_tax(dec!(28797), &table), dec!(1925.22));
//! ```

use rust_decimal::Decimal;

use super::common::floor_at_zero;
use crate::TaxBracket;

/// Tax owed on the part of `income` that falls inside `bracket`.
pub fn tax_for_bracket(
    income: Decimal,
    bracket: &TaxBracket,
) -> Decimal {
    let above_min = floor_at_zero(income - bracket.min);
    let width = match bracket.max {
        Some(max) => above_min.min(floor_at_zero(max - bracket.min)),
        None => above_min,
    };
    width * bracket.rate
}

/// Tax owed on `income` across the whole table.
pub fn total_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    brackets
        .iter()
        .map(|bracket| tax_for_bracket(income, bracket))
        .sum()
}
